// Panel editor page objects
//
// Pure functions from semantic parameters to locators. Values interpolated
// into XPath go through `xpath_literal`, so names containing quotes still
// produce a valid expression.
//
// Query and expression rows share one layout (a draggable row whose id
// contains the row name), so the row-scoped locators serve both.

use crate::locator::{Locator, xpath_literal};

fn row(row_name: &str, rest: &str) -> Locator {
    Locator::xpath(format!(
        "//*[contains(@data-rbd-draggable-id, {})]{}",
        xpath_literal(row_name),
        rest
    ))
}

/// Element whose own text is exactly `text`
pub fn text_exactly(text: &str) -> Locator {
    Locator::xpath(format!("//*[text()={}]", xpath_literal(text)))
}

// Visualization options

/// Radio group holding the Fill/Actual toggles
pub fn fill_actual_toggle() -> Locator {
    Locator::css("[data-testid='data-testid radio-button']")
}

pub fn fill_toggle() -> Locator {
    Locator::css("[id*='option-0-radiogroup']")
}

pub fn actual_toggle() -> Locator {
    Locator::css("[id*='option-2-radiogroup']")
}

pub fn visualization() -> Locator {
    Locator::css("[data-testid='data-testid panel content']")
}

pub fn panel_title_textfield() -> Locator {
    Locator::css("[id='PanelFrameTitle']")
}

pub fn repeat_by_variable_dropdown() -> Locator {
    Locator::css("[id='repeat-by-variable-select']")
}

pub fn table_view_toggle() -> Locator {
    Locator::css("[for='table-view']")
}

/// Header cell of a table-view column
pub fn table_column_name(column_name: &str) -> Locator {
    text_exactly(column_name)
}

// Data source selection

pub fn select_datasource_button() -> Locator {
    Locator::css("[data-testid='data-testid Select a data source']")
}

/// Card for `datasource_name` in the data source picker
pub fn datasource_card(datasource_name: &str) -> Locator {
    Locator::xpath(format!(
        "//div[@data-testid='data-source-card' and .//text()={}]",
        xpath_literal(datasource_name)
    ))
}

/// Data source input inside one query row
pub fn data_source_picker(query_name: &str) -> Locator {
    row(
        query_name,
        "//input[@data-testid='data-testid Select a data source']",
    )
}

// SQL editor

/// Any SQL editor toggle on the page; used to wait for the editor to load
pub fn sql_editor_toggle_any() -> Locator {
    Locator::css("[id*='option-sql']")
}

pub fn sql_editor_toggle(query_name: &str) -> Locator {
    row(query_name, "//*[contains(@id, 'option-sql')]")
}

/// Rendered lines of any SQL editor on the page
pub fn sql_editor_lines_any() -> Locator {
    Locator::css("[class='view-lines monaco-mouse-cursor-text']")
}

/// Rendered lines of the SQL editor of one query
pub fn sql_editor_input(query_name: &str) -> Locator {
    row(
        query_name,
        "//*[@class='view-lines monaco-mouse-cursor-text']",
    )
}

/// Hidden textarea that receives keyboard input for the SQL editor
pub fn input_in_sql_editor(query_name: &str) -> Locator {
    row(
        query_name,
        "//*[@class='inputarea monaco-mouse-cursor-text']",
    )
}

// Query rows

pub fn add_query_button() -> Locator {
    Locator::css("[data-testid='data-testid query-tab-add-query']")
}

pub fn expression_button() -> Locator {
    Locator::css("[data-testid='query-tab-add-expression']")
}

pub fn query_name_field(row_name: &str) -> Locator {
    row(row_name, "//button[@data-testid='query-name-div']")
}

pub fn query_name_textfield(row_name: &str) -> Locator {
    row(row_name, "//button[@data-testid='query-name-div']//input")
}

pub fn duplicate_query_button(row_name: &str) -> Locator {
    row(
        row_name,
        "//button[@data-testid='data-testid Duplicate query']",
    )
}

pub fn hide_response_query_button(row_name: &str) -> Locator {
    row(row_name, "//button[@data-testid='data-testid Hide response']")
}

pub fn delete_query_button(row_name: &str) -> Locator {
    row(row_name, "//button[@data-testid='data-testid Remove query']")
}

/// Operation select of an expression row
pub fn expression_operation_dropdown(expression_name: &str) -> Locator {
    row(
        expression_name,
        "//div[contains(@class, 'grafana-select-value-container')]",
    )
}

/// Input of an expression row; the editor renders it in the same select container
pub fn expression_textfield(expression_name: &str) -> Locator {
    expression_operation_dropdown(expression_name)
}

pub fn run_query_button() -> Locator {
    Locator::xpath("//div[contains(@id, 'A')]//button")
}

// Query inspector

pub fn query_inspector_button() -> Locator {
    Locator::css("[aria-label='Query inspector button']")
}

pub fn query_inspector_refresh_button() -> Locator {
    Locator::css("[aria-label='Panel inspector Query refresh button']")
}

/// Request URL shown in the inspector's JSON view
pub fn query_inspector_url() -> Locator {
    Locator::xpath(
        "//*[(@class='json-formatter-string' and contains(text(), 'api')) or \
         (@class='json-formatter-string json-formatter-url' and contains(text(), 'http'))]",
    )
}

// Time picker

pub fn time_picker_button() -> Locator {
    Locator::css("[data-testid='data-testid TimePicker Open Button']")
}

pub fn time_picker_from_textfield() -> Locator {
    Locator::css("[data-testid='data-testid Time Range from field']")
}

pub fn time_picker_to_textfield() -> Locator {
    Locator::css("[data-testid='data-testid Time Range to field']")
}

pub fn time_picker_submit_button() -> Locator {
    Locator::css("[data-testid='data-testid TimePicker submit button']")
}

// Panel state

pub fn panel_error() -> Locator {
    Locator::css("[data-testid='data-testid Panel status error']")
}

pub fn panel_error_for_table_view() -> Locator {
    Locator::css("[aria-label='Panel header error']")
}

pub fn data_is_missing_text() -> Locator {
    text_exactly("Data is missing a time field")
}

pub fn no_data_text() -> Locator {
    text_exactly("No data")
}

pub fn apply_button() -> Locator {
    Locator::css("[data-testid='data-testid Apply changes and go back to dashboard']")
}

pub fn discard_button() -> Locator {
    Locator::css("[title='Undo all changes']")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::SelectBy;

    #[test]
    fn test_every_locator_is_well_formed() {
        let all = [
            fill_actual_toggle(),
            fill_toggle(),
            actual_toggle(),
            visualization(),
            panel_title_textfield(),
            repeat_by_variable_dropdown(),
            table_view_toggle(),
            table_column_name("number"),
            select_datasource_button(),
            datasource_card("clickhouse"),
            data_source_picker("A"),
            sql_editor_toggle_any(),
            sql_editor_toggle("A"),
            sql_editor_lines_any(),
            sql_editor_input("A"),
            input_in_sql_editor("A"),
            add_query_button(),
            expression_button(),
            query_name_field("A"),
            query_name_textfield("A"),
            duplicate_query_button("A"),
            hide_response_query_button("A"),
            delete_query_button("A"),
            expression_operation_dropdown("B"),
            expression_textfield("B"),
            run_query_button(),
            query_inspector_button(),
            query_inspector_refresh_button(),
            query_inspector_url(),
            time_picker_button(),
            time_picker_from_textfield(),
            time_picker_to_textfield(),
            time_picker_submit_button(),
            panel_error(),
            panel_error_for_table_view(),
            data_is_missing_text(),
            no_data_text(),
            apply_button(),
            discard_button(),
        ];
        for locator in all {
            assert!(locator.validate().is_ok(), "{} should be well-formed", locator);
        }
    }

    #[test]
    fn test_row_scoped_locators_interpolate_name() {
        let locator = sql_editor_toggle("B");
        assert_eq!(locator.strategy(), SelectBy::XPath);
        assert_eq!(
            locator.expression(),
            "//*[contains(@data-rbd-draggable-id, 'B')]//*[contains(@id, 'option-sql')]"
        );
    }

    #[test]
    fn test_names_with_quotes_stay_valid() {
        let card = datasource_card("bob's clickhouse");
        assert_eq!(
            card.expression(),
            "//div[@data-testid='data-source-card' and .//text()=\"bob's clickhouse\"]"
        );
        assert!(card.validate().is_ok());
        assert!(query_name_field("it's \"A\"").validate().is_ok());
    }

    #[test]
    fn test_locators_are_pure() {
        assert_eq!(datasource_card("clickhouse"), datasource_card("clickhouse"));
        assert_ne!(sql_editor_input("A"), sql_editor_input("B"));
        assert_eq!(expression_textfield("B"), expression_operation_dropdown("B"));
    }
}
