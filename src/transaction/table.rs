//! The paginated table of a user's transactions shown on the dashboard.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, edit_delete_action_links,
        format_currency,
    },
    pagination::{PaginationIndicator, pagination_view},
    transaction::TransactionRow,
};

/// Where the table is shown and which page is being shown, used to build
/// page links and to send the user back to the same page after an edit.
pub struct TablePosition<'a> {
    pub base_url: &'a str,
    pub page: u64,
    pub per_page: u64,
}

impl TablePosition<'_> {
    fn page_url(&self, page: u64) -> String {
        format!("{}?page={page}&per_page={}", self.base_url, self.per_page)
    }
}

pub fn transactions_table_view(
    rows: &[TransactionRow],
    indicators: &[PaginationIndicator],
    position: &TablePosition<'_>,
) -> Markup {
    let current_page_url = position.page_url(position.page);

    html! {
        section class="w-full"
        {
            h2 class="text-xl font-semibold mb-4" { "Transactions" }

            @if rows.is_empty() {
                p class="text-gray-600 dark:text-gray-400" { "No transactions recorded yet." }
            } @else {
                div class="relative overflow-x-auto shadow-md rounded-lg"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Budget" }
                                th scope="col" class="px-6 py-4 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (transaction_row_view(row, &current_page_url))
                            }
                        }
                    }
                }

                (pagination_view(indicators, |page| position.page_url(page)))
            }
        }
    }
}

fn transaction_row_view(row: &TransactionRow, redirect_url: &str) -> Markup {
    let edit_url = format!(
        "{}?redirect_url={}",
        endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, row.id),
        urlencode(redirect_url)
    );
    let delete_url = endpoints::format_endpoint(endpoints::TRANSACTION_API, row.id);
    let confirm_message = format!(
        "Are you sure you want to delete '{}'? Its amount will be taken off its budget.",
        row.title
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row
        {
            td class=(TABLE_CELL_STYLE) { (row.date) }
            td class=(TABLE_CELL_STYLE) { (row.title) }
            td class=(TABLE_CELL_STYLE)
            {
                @match &row.budget_title {
                    Some(title) => { (title) }
                    None => { span class="italic text-gray-400" { "Deleted budget" } }
                }
            }
            td class="px-6 py-4 text-right" { (format_currency(row.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        &confirm_message,
                        "closest tr",
                        "delete",
                    ))
                }
            }
        }
    }
}

fn urlencode(value: &str) -> String {
    serde_urlencoded::to_string([("", value)])
        .map(|encoded| encoded.trim_start_matches('=').to_owned())
        .unwrap_or_default()
}
