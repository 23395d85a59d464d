//! Transactions: individual spends recorded against a budget.
//!
//! Creating, editing and deleting a transaction also updates the spent total
//! of the budgets involved so that it always equals the sum of their transactions.

mod balance;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod table;

pub use balance::{create_transaction, delete_transaction, edit_transaction};
pub use core::{
    NewTransaction, Transaction, TransactionId, TransactionRow, TransactionTitle,
    count_transactions, create_transaction_table, get_transaction, get_transaction_rows,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use form::{TransactionFormDefaults, transaction_form_fields};
pub use table::{TablePosition, transactions_table_view};

#[cfg(test)]
pub use core::{delete_transaction_row, insert_transaction, update_transaction};
