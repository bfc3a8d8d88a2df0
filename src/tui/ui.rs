use crate::core::countries::NodeCode;
use crate::core::state::{App, Screen};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{StatusBar, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};

const EXIT_NODE_TITLE: &str = "TOR Exit Node Change";
const TORRC_PATH_TITLE: &str = "TOR File Path Configuration";

/// Country list box: longest entry "> (X) Switzerland" plus borders.
const LIST_WIDTH: u16 = 30;
const LIST_HEIGHT: u16 = NodeCode::ALL.len() as u16 + 2;
const PATH_INPUT_MAX_WIDTH: u16 = 72;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Length(1), Min(0), Length(3), Length(1), Length(1)]);
    let [title_area, _, content_area, buttons_area, _, status_area] = layout.areas(frame.area());

    match app.screen {
        Screen::ExitNode => {
            TitleBar::new(EXIT_NODE_TITLE).render(frame, title_area);

            let list_area = centered(content_area, LIST_WIDTH, LIST_HEIGHT);
            tui.country_list.render(frame, list_area);
            tui.exit_node_buttons.render(frame, buttons_area);

            StatusBar::new("Current Exit Node", app.current_country(), &app.status_message)
                .render(frame, status_area);
        }
        Screen::TorrcPath => {
            TitleBar::new(TORRC_PATH_TITLE).render(frame, title_area);

            let input_area = centered(
                content_area,
                PATH_INPUT_MAX_WIDTH.min(content_area.width),
                3,
            );
            tui.path_input.render(frame, input_area);
            tui.torrc_buttons.render(frame, buttons_area);

            let torrc = app.torrc_display();
            StatusBar::new("Torrc file path", &torrc, &app.status_message)
                .render(frame, status_area);
        }
    }
}

/// A `width` x `height` rect centered in `outer`, clamped to it.
fn centered(outer: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(outer);
    let [center] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    center
}
