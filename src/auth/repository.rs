use super::{model::Account, sheet::Sheet};
use crate::error::CustomError;

/// First data row; row 0 holds the header.
const FIRST_DATA_ROW: usize = 1;

/// A data row whose username and password matched, cells as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMatch {
    pub row_index: usize,
    pub created_at: String,
}

pub struct AuthRepository<S: Sheet> {
    sheet: S,
}

impl<S: Sheet> AuthRepository<S> {
    pub fn new(sheet: S) -> Self {
        AuthRepository { sheet }
    }

    pub fn sheet(&self) -> &S {
        &self.sheet
    }

    /// Full scan; usernames compare by exact value.
    pub async fn username_exists(&self, username: &str) -> Result<bool, CustomError> {
        let rows = self.sheet.values().await?;
        Ok(rows
            .iter()
            .skip(FIRST_DATA_ROW)
            .any(|row| cell(row, 0) == username))
    }

    /// Returns the first row, in insertion order, matching both fields.
    /// The `created_at` cell is passed through unparsed.
    pub async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<RowMatch>, CustomError> {
        let rows = self.sheet.values().await?;
        Ok(rows
            .iter()
            .enumerate()
            .skip(FIRST_DATA_ROW)
            .find(|(_, row)| cell(row, 0) == username && cell(row, 1) == password)
            .map(|(row_index, row)| RowMatch {
                row_index,
                created_at: cell(row, 2).to_string(),
            }))
    }

    pub async fn insert_account(&self, account: &Account) -> Result<(), CustomError> {
        self.sheet.append_row(account.to_row()).await
    }
}

fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(String::as_str).unwrap_or("")
}
