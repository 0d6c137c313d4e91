//! Aging classification for outstanding documents.
//!
//! Buckets an outstanding receivable or payable by the number of days its
//! due date lies in the past as of a reporting date, then groups the bucketed
//! documents per counterparty with subtotals and a grand total.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aging bucket by days overdue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucket {
    /// Not yet due (including due today).
    Current,
    /// 1 to 30 days overdue.
    Days1To30,
    /// 31 to 60 days overdue.
    Days31To60,
    /// 61 to 90 days overdue.
    Days61To90,
    /// More than 90 days overdue.
    Over90,
}

impl AgingBucket {
    /// All buckets in report column order.
    pub const ALL: [Self; 5] = [
        Self::Current,
        Self::Days1To30,
        Self::Days31To60,
        Self::Days61To90,
        Self::Over90,
    ];

    /// Classifies by days overdue: `as_of - due_date` in whole days.
    ///
    /// Zero or negative means not yet due. Boundary days (30, 60, 90) fall
    /// in the lower bucket.
    #[must_use]
    pub fn classify(due_date: NaiveDate, as_of: NaiveDate) -> Self {
        let days_overdue = (as_of - due_date).num_days();
        match days_overdue {
            i64::MIN..=0 => Self::Current,
            1..=30 => Self::Days1To30,
            31..=60 => Self::Days31To60,
            61..=90 => Self::Days61To90,
            _ => Self::Over90,
        }
    }

    /// Report column label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Days1To30 => "1-30 Days",
            Self::Days31To60 => "31-60 Days",
            Self::Days61To90 => "61-90 Days",
            Self::Over90 => "Over 90 Days",
        }
    }
}

/// Lifecycle status of an ageable document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Open, outstanding amount may be nonzero.
    Open,
    /// Partially paid.
    PartiallyPaid,
    /// Fully settled.
    Paid,
    /// Cancelled, never aged.
    Cancelled,
}

/// A document eligible for aging (invoice or bill).
#[derive(Debug, Clone)]
pub struct AgeableDocument {
    /// Counterparty (customer or vendor) ID.
    pub counterparty_id: Uuid,
    /// Counterparty display name.
    pub counterparty_name: String,
    /// Document number shown in the report.
    pub document_number: String,
    /// Due date.
    pub due_date: NaiveDate,
    /// Amount still outstanding.
    pub outstanding: Decimal,
    /// Lifecycle status.
    pub status: DocumentStatus,
}

/// Per-bucket totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTotals {
    /// Not yet due.
    pub current: Decimal,
    /// 1 to 30 days overdue.
    pub days_1_30: Decimal,
    /// 31 to 60 days overdue.
    pub days_31_60: Decimal,
    /// 61 to 90 days overdue.
    pub days_61_90: Decimal,
    /// More than 90 days overdue.
    pub over_90: Decimal,
}

impl BucketTotals {
    fn add(&mut self, bucket: AgingBucket, amount: Decimal) {
        match bucket {
            AgingBucket::Current => self.current += amount,
            AgingBucket::Days1To30 => self.days_1_30 += amount,
            AgingBucket::Days31To60 => self.days_31_60 += amount,
            AgingBucket::Days61To90 => self.days_61_90 += amount,
            AgingBucket::Over90 => self.over_90 += amount,
        }
    }

    fn merge(&mut self, other: &Self) {
        self.current += other.current;
        self.days_1_30 += other.days_1_30;
        self.days_31_60 += other.days_31_60;
        self.days_61_90 += other.days_61_90;
        self.over_90 += other.over_90;
    }

    /// Sum across all buckets.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.current + self.days_1_30 + self.days_31_60 + self.days_61_90 + self.over_90
    }
}

/// One bucketed document in the report detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgedDocument {
    /// Document number.
    pub document_number: String,
    /// Due date.
    pub due_date: NaiveDate,
    /// Outstanding amount.
    pub outstanding: Decimal,
    /// Assigned bucket.
    pub bucket: AgingBucket,
}

/// One counterparty group with its documents and subtotals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterpartyAging {
    /// Counterparty ID.
    pub counterparty_id: Uuid,
    /// Counterparty name.
    pub counterparty_name: String,
    /// Bucketed documents, in input order.
    pub documents: Vec<AgedDocument>,
    /// Per-bucket subtotals for this counterparty.
    pub subtotals: BucketTotals,
}

/// The full aging report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingReport {
    /// Reporting date.
    pub as_of: NaiveDate,
    /// Counterparty groups, sorted by name.
    pub groups: Vec<CounterpartyAging>,
    /// Grand totals across all counterparties.
    pub grand_totals: BucketTotals,
}

impl AgingReport {
    /// Total outstanding across all buckets and counterparties.
    #[must_use]
    pub fn total_outstanding(&self) -> Decimal {
        self.grand_totals.total()
    }
}

/// Builds an aging report from a document set.
///
/// Cancelled documents and documents with no outstanding amount are skipped.
/// Documents are grouped by counterparty; groups come out sorted by name
/// with the counterparty ID as a tiebreaker.
#[must_use]
pub fn age_documents(documents: Vec<AgeableDocument>, as_of: NaiveDate) -> AgingReport {
    let mut groups: Vec<CounterpartyAging> = Vec::new();

    for doc in documents {
        if doc.status == DocumentStatus::Cancelled || doc.outstanding <= Decimal::ZERO {
            continue;
        }
        let bucket = AgingBucket::classify(doc.due_date, as_of);

        let idx = groups
            .iter()
            .position(|g| g.counterparty_id == doc.counterparty_id)
            .unwrap_or_else(|| {
                groups.push(CounterpartyAging {
                    counterparty_id: doc.counterparty_id,
                    counterparty_name: doc.counterparty_name.clone(),
                    documents: Vec::new(),
                    subtotals: BucketTotals::default(),
                });
                groups.len() - 1
            });

        groups[idx].subtotals.add(bucket, doc.outstanding);
        groups[idx].documents.push(AgedDocument {
            document_number: doc.document_number,
            due_date: doc.due_date,
            outstanding: doc.outstanding,
            bucket,
        });
    }

    groups.sort_by(|a, b| {
        a.counterparty_name
            .cmp(&b.counterparty_name)
            .then_with(|| a.counterparty_id.cmp(&b.counterparty_id))
    });

    let mut grand_totals = BucketTotals::default();
    for group in &groups {
        grand_totals.merge(&group.subtotals);
    }

    AgingReport {
        as_of,
        groups,
        grand_totals,
    }
}
