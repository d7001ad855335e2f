// Panel editor steps
//
// User-level actions on the panel editor. Every step takes the session
// explicitly and waits for its element before acting. Composite steps run
// their parts as nested named steps.
//
// `check_*` steps answer a yes/no question about the UI: only a wait timeout
// counts as "no"; malformed locators and driver failures still propagate.

use super::locators;
use crate::condition::WaitCondition;
use crate::driver::UiDriver;
use crate::error::{Error, Result};
use crate::session::Session;
use std::path::PathBuf;

/// Waits for the Fill/Actual toggle group to accept clicks.
pub async fn wait_fill_actual_toggle<D: UiDriver>(session: &Session<D>) -> Result<()> {
    session
        .wait_for_element_to_be_clickable(&locators::fill_actual_toggle())
        .await?;
    Ok(())
}

/// Switches the visualization to "Fill".
pub async fn fill<D: UiDriver>(session: &Session<D>) -> Result<()> {
    session
        .step("waiting fill toggle", wait_fill_actual_toggle(session))
        .await?;
    session
        .step("clicking fill toggle", session.click(&locators::fill_toggle()))
        .await
}

/// Switches the visualization to "Actual".
pub async fn actual<D: UiDriver>(session: &Session<D>) -> Result<()> {
    session
        .step("waiting actual toggle", wait_fill_actual_toggle(session))
        .await?;
    session
        .step(
            "clicking actual toggle",
            session.click(&locators::actual_toggle()),
        )
        .await
}

/// Opens the data source picker and picks `datasource_name`.
pub async fn select_datasource_in_panel_view<D: UiDriver>(
    session: &Session<D>,
    datasource_name: &str,
) -> Result<()> {
    let card = locators::datasource_card(datasource_name);

    session
        .step(
            "clicking datasource dropdown",
            session.click(&locators::select_datasource_button()),
        )
        .await?;
    session
        .step(
            "waiting datasource in datasource dropdown",
            session.wait_for_element_to_be_clickable(&card),
        )
        .await?;
    session
        .delay(session.step("selecting datasource in dropdown", session.click(&card)))
        .await
}

/// Waits for the SQL editor toggle and switches `query_name` to SQL mode.
pub async fn go_to_sql_editor<D: UiDriver>(session: &Session<D>, query_name: &str) -> Result<()> {
    session
        .step(
            "waiting sql editor toggle",
            session.wait_for_element_to_be_present(&locators::sql_editor_toggle_any()),
        )
        .await?;
    session
        .step(
            "clicking SQL Editor toggle",
            session.click(&locators::sql_editor_toggle(query_name)),
        )
        .await
}

/// Replaces the first line of the SQL editor of `query_name` with `query`.
pub async fn enter_sql_editor_input<D: UiDriver>(
    session: &Session<D>,
    query: &str,
    query_name: &str,
) -> Result<()> {
    session
        .step(
            "waiting SQL editor",
            session.wait_for_element_to_be_present(&locators::sql_editor_lines_any()),
        )
        .await?;
    session
        .step("selecting input string", select_input_query(session, query_name))
        .await?;
    session
        .step(
            "entering request",
            session.type_text(&locators::input_in_sql_editor(query_name), query),
        )
        .await
}

/// Selects the current editor line (double click, then a third click).
pub async fn select_input_query<D: UiDriver>(
    session: &Session<D>,
    query_name: &str,
) -> Result<()> {
    let lines = locators::sql_editor_input(query_name);
    session.double_click(&lines).await?;
    session.click(&lines).await
}

/// Current content of the SQL editor input of `query_name`.
pub async fn get_input_query<D: UiDriver>(
    session: &Session<D>,
    query_name: &str,
) -> Result<String> {
    session
        .text(&locators::input_in_sql_editor(query_name))
        .await
}

pub async fn click_on_the_visualization<D: UiDriver>(session: &Session<D>) -> Result<()> {
    session.click(&locators::visualization()).await
}

/// Double click on the graph zooms the time range out.
pub async fn double_click_on_visualization<D: UiDriver>(session: &Session<D>) -> Result<()> {
    let visualization = locators::visualization();
    session.double_click(&visualization).await?;
    session.click(&visualization).await
}

pub async fn wait_visualization<D: UiDriver>(session: &Session<D>) -> Result<()> {
    session
        .wait_for_element_to_be_visible(&locators::visualization())
        .await?;
    Ok(())
}

/// Waits for the visualization and saves `<screenshot_dir>/<name>.png`.
pub async fn take_screenshot_for_visualization<D: UiDriver>(
    session: &Session<D>,
    screenshot_name: &str,
) -> Result<PathBuf> {
    session
        .step("I wait visualization to be loaded", wait_visualization(session))
        .await?;
    session
        .step(
            "I take screenshot",
            session.screenshot_element(&locators::visualization(), screenshot_name),
        )
        .await
}

pub async fn change_panel_title<D: UiDriver>(
    session: &Session<D>,
    panel_title: &str,
) -> Result<()> {
    let title = locators::panel_title_textfield();
    session
        .step("clearing panel title", session.clear(&title))
        .await?;
    session
        .step(
            "entering new panel title",
            session.type_text(&title, panel_title),
        )
        .await
}

pub async fn change_repeat_by_variable_option<D: UiDriver>(
    session: &Session<D>,
    variable_name: &str,
) -> Result<()> {
    session
        .type_text(&locators::repeat_by_variable_dropdown(), variable_name)
        .await
}

/// Whether the panel shows its error banner.
pub async fn check_panel_error_exists<D: UiDriver>(session: &Session<D>) -> Result<bool> {
    session
        .step(
            "checking error",
            session.check(&locators::panel_error(), WaitCondition::Visible),
        )
        .await
}

/// Opens the query inspector, refreshes it, and checks the request URL
/// contains every part of `url_parts`.
pub async fn check_query_inspector_request<D: UiDriver>(
    session: &Session<D>,
    url_parts: &[&str],
) -> Result<()> {
    session
        .step(
            "opening query inspector",
            session.delay(session.click(&locators::query_inspector_button())),
        )
        .await?;
    session
        .step(
            "clicking refresh button in query inspector",
            session.delay(session.click(&locators::query_inspector_refresh_button())),
        )
        .await?;

    session
        .step("checking url contains necessary parts", async {
            let url = session.text(&locators::query_inspector_url()).await?;
            let missing: Vec<&str> = url_parts
                .iter()
                .copied()
                .filter(|part| !url.contains(part))
                .collect();
            if missing.is_empty() {
                Ok(())
            } else {
                Err(Error::StepFailed(format!(
                    "query inspector URL '{}' is missing {:?}",
                    url, missing
                )))
            }
        })
        .await
}

/// Renames a query row; also used for expression rows.
pub async fn change_query_name<D: UiDriver>(
    session: &Session<D>,
    query_name: &str,
    new_query_name: &str,
) -> Result<()> {
    session.click(&locators::query_name_field(query_name)).await?;
    session
        .type_and_submit(&locators::query_name_textfield(query_name), new_query_name)
        .await
}

pub async fn change_expression_name<D: UiDriver>(
    session: &Session<D>,
    expression_name: &str,
    new_expression_name: &str,
) -> Result<()> {
    change_query_name(session, expression_name, new_expression_name).await
}

pub async fn click_duplicate_query<D: UiDriver>(
    session: &Session<D>,
    query_name: &str,
) -> Result<()> {
    session
        .click(&locators::duplicate_query_button(query_name))
        .await
}

pub async fn click_hide_response_query<D: UiDriver>(
    session: &Session<D>,
    query_name: &str,
) -> Result<()> {
    session
        .click(&locators::hide_response_query_button(query_name))
        .await
}

pub async fn click_delete_query<D: UiDriver>(
    session: &Session<D>,
    query_name: &str,
) -> Result<()> {
    session
        .click(&locators::delete_query_button(query_name))
        .await
}

pub async fn click_duplicate_expression<D: UiDriver>(
    session: &Session<D>,
    expression_name: &str,
) -> Result<()> {
    click_duplicate_query(session, expression_name).await
}

pub async fn click_hide_response_expression<D: UiDriver>(
    session: &Session<D>,
    expression_name: &str,
) -> Result<()> {
    click_hide_response_query(session, expression_name).await
}

pub async fn click_delete_expression<D: UiDriver>(
    session: &Session<D>,
    expression_name: &str,
) -> Result<()> {
    click_delete_query(session, expression_name).await
}

pub async fn click_add_query_button<D: UiDriver>(session: &Session<D>) -> Result<()> {
    session.click(&locators::add_query_button()).await
}

pub async fn click_expression_button<D: UiDriver>(session: &Session<D>) -> Result<()> {
    session.click(&locators::expression_button()).await
}

pub async fn enter_expression_operation<D: UiDriver>(
    session: &Session<D>,
    expression_name: &str,
    operation_type: &str,
) -> Result<()> {
    session
        .type_and_submit(
            &locators::expression_operation_dropdown(expression_name),
            operation_type,
        )
        .await
}

pub async fn enter_expression<D: UiDriver>(
    session: &Session<D>,
    expression_name: &str,
    expression: &str,
) -> Result<()> {
    session
        .type_and_submit(&locators::expression_textfield(expression_name), expression)
        .await
}

/// Sets the dashboard time range through the time picker.
pub async fn enter_time<D: UiDriver>(
    session: &Session<D>,
    time_from: &str,
    time_to: &str,
) -> Result<()> {
    session
        .step(
            "I open time modal",
            session.delay(session.click(&locators::time_picker_button())),
        )
        .await?;

    session
        .step(
            "I enter time from",
            session.delay(async {
                let from = locators::time_picker_from_textfield();
                session.clear(&from).await?;
                session.type_text(&from, time_from).await
            }),
        )
        .await?;

    session
        .step(
            "I enter time to",
            session.delay(async {
                let to = locators::time_picker_to_textfield();
                session.clear(&to).await?;
                session.type_text(&to, time_to).await
            }),
        )
        .await?;

    session
        .step(
            "I click submit button",
            session.delay(session.click(&locators::time_picker_submit_button())),
        )
        .await
}

pub async fn enter_data_source_for_query<D: UiDriver>(
    session: &Session<D>,
    query_name: &str,
    datasource_name: &str,
) -> Result<()> {
    session
        .type_and_submit(&locators::data_source_picker(query_name), datasource_name)
        .await
}

pub async fn click_apply_button<D: UiDriver>(session: &Session<D>) -> Result<()> {
    session.click(&locators::apply_button()).await
}

pub async fn click_discard_button<D: UiDriver>(session: &Session<D>) -> Result<()> {
    session.click(&locators::discard_button()).await
}

pub async fn click_run_query_button<D: UiDriver>(session: &Session<D>) -> Result<()> {
    session.click(&locators::run_query_button()).await
}

pub async fn click_table_view_toggle<D: UiDriver>(session: &Session<D>) -> Result<()> {
    session.click(&locators::table_view_toggle()).await
}

/// Whether "Data is missing a time field" is displayed.
pub async fn check_data_is_missing_text<D: UiDriver>(session: &Session<D>) -> Result<bool> {
    session
        .step(
            "checking 'Data is missing a time field' text is displayed",
            session.check(&locators::data_is_missing_text(), WaitCondition::Visible),
        )
        .await
}

/// Whether every column in `columns` is displayed in table view.
pub async fn check_columns_in_table_view<D: UiDriver>(
    session: &Session<D>,
    columns: &[&str],
) -> Result<bool> {
    let name = format!("checking {} columns is displayed", columns.join(","));
    session
        .step(&name, all_columns_visible(session, columns))
        .await
}

async fn all_columns_visible<D: UiDriver>(
    session: &Session<D>,
    columns: &[&str],
) -> Result<bool> {
    for column in columns {
        let locator = locators::table_column_name(column);
        if !session.check(&locator, WaitCondition::Visible).await? {
            tracing::info!("Column {} is not displayed", column);
            return Ok(false);
        }
    }
    Ok(true)
}

/// Whether "No data" is displayed.
pub async fn check_no_data_text<D: UiDriver>(session: &Session<D>) -> Result<bool> {
    session
        .step(
            "checking 'No data' text is displayed",
            session.check(&locators::no_data_text(), WaitCondition::Visible),
        )
        .await
}

/// Whether the panel header shows its error marker in table view.
pub async fn check_error_for_table_view<D: UiDriver>(session: &Session<D>) -> Result<bool> {
    session
        .step(
            "checking error is displayed in table view",
            session.check(&locators::panel_error_for_table_view(), WaitCondition::Visible),
        )
        .await
}
