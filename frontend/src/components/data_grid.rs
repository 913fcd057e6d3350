//! Sortable, paginated grid of flattened records with row selection.

use leptos::*;
use std::collections::BTreeSet;

use crate::grid::{
    cell_text, next_sort, page_count, page_slice, row_id, sort_rows, toggle_page_selection,
    toggle_selection, SortDirection, SortState,
};
use crate::{CellRender, Column, Row, PAGE_SIZE};

#[component]
pub fn DataGrid(columns: ReadSignal<Vec<Column>>, rows: ReadSignal<Vec<Row>>) -> impl IntoView {
    let (sort, set_sort) = create_signal(None::<SortState>);
    let (page, set_page) = create_signal(0usize);
    let selection = create_rw_signal(BTreeSet::<String>::new());

    // New data: back to the first page, nothing selected.
    create_effect(move |_| {
        rows.track();
        set_page.set(0);
        selection.set(BTreeSet::new());
    });

    let sorted = create_memo(move |_| rows.with(|r| sort_rows(r, sort.get().as_ref())));
    let pages = move || page_count(sorted.with(Vec::len), PAGE_SIZE);
    let visible = move || sorted.with(|r| page_slice(r, page.get(), PAGE_SIZE).to_vec());

    let report_selection = move || {
        selection.with(|s| log::info!("Selected rows ({}): {:?}", s.len(), s));
    };

    let header_cells = move || {
        columns
            .get()
            .into_iter()
            .map(|col| {
                let field = col.field.clone();
                let indicator = {
                    let field = field.clone();
                    move || match sort.get() {
                        Some(s) if s.field == field => match s.direction {
                            SortDirection::Asc => " ▲",
                            SortDirection::Desc => " ▼",
                        },
                        _ => "",
                    }
                };
                view! {
                    <th
                        style=format!("width: {}px", col.width)
                        class="sortable"
                        on:click=move |_| {
                            let next = next_sort(sort.get().as_ref(), &field);
                            set_sort.set(next);
                        }
                    >
                        {col.header_name.clone()}
                        {indicator}
                    </th>
                }
            })
            .collect_view()
    };

    let body_rows = move || {
        let cols = columns.get();
        visible()
            .into_iter()
            .map(|row| {
                let id = row_id(&row);
                let checked_id = id.clone();
                let cells = cols
                    .iter()
                    .map(|col| {
                        let text = cell_text(row.get(&col.field));
                        match col.render {
                            CellRender::Link if !text.is_empty() => view! {
                                <td><a href=text.clone() target="_blank" rel="noopener">{text}</a></td>
                            }
                            .into_view(),
                            _ => view! { <td>{text}</td> }.into_view(),
                        }
                    })
                    .collect_view();

                view! {
                    <tr class:selected=move || selection.with(|s| s.contains(&checked_id))>
                        <td class="select-cell">
                            <input
                                type="checkbox"
                                prop:checked={
                                    let id = id.clone();
                                    move || selection.with(|s| s.contains(&id))
                                }
                                on:change={
                                    let id = id.clone();
                                    move |_| {
                                        selection.update(|s| toggle_selection(s, &id));
                                        report_selection();
                                    }
                                }
                            />
                        </td>
                        {cells}
                    </tr>
                }
            })
            .collect_view()
    };

    let on_select_page = move |_| {
        let current = visible();
        selection.update(|s| toggle_page_selection(s, &current));
        report_selection();
    };

    view! {
        <div class="grid-section">
            <div class="grid-scroll">
                <table class="data-grid">
                    <thead>
                        <tr>
                            <th class="select-cell">
                                <input type="checkbox" on:change=on_select_page/>
                            </th>
                            {header_cells}
                        </tr>
                    </thead>
                    <tbody>{body_rows}</tbody>
                </table>
            </div>
            <div class="grid-footer">
                <span>
                    {move || format!(
                        "{} records • {} selected",
                        rows.with(Vec::len),
                        selection.with(BTreeSet::len)
                    )}
                </span>
                <div class="pagination">
                    <button
                        class="btn btn-secondary"
                        disabled=move || page.get() == 0
                        on:click=move |_| set_page.update(|p| *p = p.saturating_sub(1))
                    >
                        "‹"
                    </button>
                    <span>{move || format!("{} / {}", page.get() + 1, pages())}</span>
                    <button
                        class="btn btn-secondary"
                        disabled=move || page.get() + 1 >= pages()
                        on:click=move |_| set_page.update(|p| *p += 1)
                    >
                        "›"
                    </button>
                </div>
            </div>
        </div>
    }
}
