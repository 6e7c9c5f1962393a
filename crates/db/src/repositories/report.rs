//! Report repository: read-only projections over the ledger.
//!
//! Every query here is a snapshot read against committed data; none
//! mutate anything, mirroring the teacher's own report repository split
//! of "load the rows, aggregate in Rust" rather than pushing aggregation
//! into ad hoc SQL strings.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::entities::{
    accounts, risk_scores, sea_orm_active_enums::{RiskVerdict, TransactionStatus, TransactionTypeCode},
    transaction_entries, transaction_types, transactions,
};

/// One line of the balance sheet: total customer-owed balance in one
/// currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSheetLine {
    /// ISO 4217 currency code.
    pub currency: String,
    /// Sum of `current_balance` over every account in that currency.
    pub total_balance: Decimal,
}

/// A transaction whose entries fail to sum to zero beyond tolerance — a
/// standing integrity assertion failure (spec.md §8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityViolation {
    /// The offending transaction.
    pub transaction_id: Uuid,
    /// The non-zero sum of its entries.
    pub sum: Decimal,
}

/// One row of a customer statement: a single entry joined against its
/// transaction and transaction type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerStatement {
    /// The account this entry posted against.
    pub account_id: Uuid,
    /// The transaction this entry belongs to.
    pub transaction_id: Uuid,
    /// When the entry was posted.
    pub posted_at: DateTime<FixedOffset>,
    /// The kind of operation.
    pub type_code: TransactionTypeCode,
    /// Free-form description, if any.
    pub description: Option<String>,
    /// Signed amount.
    pub amount: Decimal,
    /// Balance immediately after this entry.
    pub balance_after: Decimal,
    /// Transaction header status.
    pub status: TransactionStatus,
}

/// A transaction flagged by the anomaly-scoring worker.
#[derive(Debug, Clone)]
pub struct FlaggedTransaction {
    /// The flagged transaction header.
    pub transaction: transactions::Model,
    /// The risk score that flagged it.
    pub risk_score: risk_scores::Model,
}

/// Filters for [`ReportRepository::history`].
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    /// Restrict to one operation kind.
    pub type_code: Option<TransactionTypeCode>,
    /// Restrict to entries posted on or after this time.
    pub date_from: Option<DateTime<FixedOffset>>,
    /// Restrict to entries posted on or before this time.
    pub date_to: Option<DateTime<FixedOffset>>,
    /// Restrict to entries whose absolute amount is at least this.
    pub amount_min: Option<Decimal>,
    /// Restrict to entries whose absolute amount is at most this.
    pub amount_max: Option<Decimal>,
    /// Case-insensitive substring match against the transaction
    /// description.
    pub description_contains: Option<String>,
}

/// Report repository for read-only ledger views.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Total balance owed to users, grouped by currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balance_sheet(&self) -> Result<Vec<BalanceSheetLine>, DbErr> {
        let rows = accounts::Entity::find().all(&self.db).await?;

        let mut totals: std::collections::BTreeMap<String, Decimal> = std::collections::BTreeMap::new();
        for account in rows {
            *totals.entry(account.currency).or_insert(Decimal::ZERO) += account.current_balance;
        }

        Ok(totals
            .into_iter()
            .map(|(currency, total_balance)| BalanceSheetLine {
                currency,
                total_balance,
            })
            .collect())
    }

    /// Finds every completed transaction whose entries do not sum to
    /// zero within `tolerance`. An empty result is a healthy ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn ledger_integrity_check(
        &self,
        tolerance: Decimal,
    ) -> Result<Vec<IntegrityViolation>, DbErr> {
        let completed_ids: Vec<Uuid> = transactions::Entity::find()
            .filter(transactions::Column::Status.eq(TransactionStatus::Completed))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();

        if completed_ids.is_empty() {
            return Ok(Vec::new());
        }

        let entries = transaction_entries::Entity::find()
            .filter(transaction_entries::Column::TransactionId.is_in(completed_ids))
            .all(&self.db)
            .await?;

        let mut sums: std::collections::HashMap<Uuid, Decimal> = std::collections::HashMap::new();
        for entry in entries {
            *sums.entry(entry.transaction_id).or_insert(Decimal::ZERO) += entry.amount;
        }

        Ok(sums
            .into_iter()
            .filter(|(_, sum)| sum.abs() > tolerance)
            .map(|(transaction_id, sum)| IntegrityViolation { transaction_id, sum })
            .collect())
    }

    /// A time-ordered statement of every entry across every account
    /// owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn customer_statement(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CustomerStatement>, DbErr> {
        let account_ids: Vec<Uuid> = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();

        if account_ids.is_empty() {
            return Ok(Vec::new());
        }

        let entries = transaction_entries::Entity::find()
            .filter(transaction_entries::Column::AccountId.is_in(account_ids))
            .order_by_asc(transaction_entries::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.join_statement_rows(entries).await
    }

    /// The last `limit` entries for a single account, newest first, each
    /// carrying its own `balance_after` snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn mini_statement(
        &self,
        account_id: Uuid,
        limit: u64,
    ) -> Result<Vec<CustomerStatement>, DbErr> {
        let mut entries = transaction_entries::Entity::find()
            .filter(transaction_entries::Column::AccountId.eq(account_id))
            .order_by_desc(transaction_entries::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        entries.reverse();

        self.join_statement_rows(entries).await
    }

    /// Paginated, filtered entry history across every account owned by
    /// `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history(
        &self,
        user_id: Uuid,
        filter: &HistoryFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<CustomerStatement>, DbErr> {
        let statement = self.customer_statement(user_id).await?;

        Ok(statement
            .into_iter()
            .filter(|row| filter.type_code.is_none_or(|t| t == row.type_code))
            .filter(|row| filter.date_from.is_none_or(|from| row.posted_at >= from))
            .filter(|row| filter.date_to.is_none_or(|to| row.posted_at <= to))
            .filter(|row| filter.amount_min.is_none_or(|min| row.amount.abs() >= min))
            .filter(|row| filter.amount_max.is_none_or(|max| row.amount.abs() <= max))
            .filter(|row| {
                filter.description_contains.as_ref().is_none_or(|needle| {
                    row.description
                        .as_deref()
                        .unwrap_or_default()
                        .to_lowercase()
                        .contains(&needle.to_lowercase())
                })
            })
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }

    /// Transactions flagged `SUSPICIOUS` or `CRITICAL`, ordered by risk
    /// score descending.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn flagged_transactions(&self) -> Result<Vec<FlaggedTransaction>, DbErr> {
        let mut scores = risk_scores::Entity::find()
            .filter(
                risk_scores::Column::Verdict
                    .is_in([RiskVerdict::Suspicious, RiskVerdict::Critical]),
            )
            .all(&self.db)
            .await?;
        scores.sort_by(|a, b| b.score.cmp(&a.score));

        let mut result = Vec::with_capacity(scores.len());
        for score in scores {
            if let Some(transaction) = transactions::Entity::find_by_id(score.transaction_id)
                .one(&self.db)
                .await?
            {
                result.push(FlaggedTransaction {
                    transaction,
                    risk_score: score,
                });
            }
        }
        Ok(result)
    }

    async fn join_statement_rows(
        &self,
        entries: Vec<transaction_entries::Model>,
    ) -> Result<Vec<CustomerStatement>, DbErr> {
        let transaction_ids: Vec<Uuid> = entries.iter().map(|e| e.transaction_id).collect();
        let headers = transactions::Entity::find()
            .filter(transactions::Column::Id.is_in(transaction_ids))
            .all(&self.db)
            .await?;
        let headers: std::collections::HashMap<Uuid, transactions::Model> =
            headers.into_iter().map(|t| (t.id, t)).collect();

        let type_ids: Vec<Uuid> = headers.values().map(|t| t.type_id).collect();
        let types = transaction_types::Entity::find()
            .filter(transaction_types::Column::Id.is_in(type_ids))
            .all(&self.db)
            .await?;
        let types: std::collections::HashMap<Uuid, TransactionTypeCode> =
            types.into_iter().map(|t| (t.id, t.type_code)).collect();

        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(header) = headers.get(&entry.transaction_id) else {
                continue;
            };
            let Some(&type_code) = types.get(&header.type_id) else {
                continue;
            };
            rows.push(CustomerStatement {
                account_id: entry.account_id,
                transaction_id: entry.transaction_id,
                posted_at: entry.created_at,
                type_code,
                description: header.description.clone(),
                amount: entry.amount,
                balance_after: entry.balance_after,
                status: header.status,
            });
        }
        Ok(rows)
    }
}
