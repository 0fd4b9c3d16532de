//! Component trait shared by the dashboard's UI regions.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;
use crate::view::DashboardView;

/// A region of the screen that reacts to keys and actions.
///
/// Components never touch the controller. They read a [`DashboardView`]
/// snapshot when drawing and return actions for the app loop to apply.
pub trait Component {
    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key_event(&mut self, _key: KeyEvent, _view: &DashboardView) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Process a dispatched action. May return a follow-up action.
    fn update(&mut self, _action: &Action, _view: &DashboardView) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &DashboardView);
}
