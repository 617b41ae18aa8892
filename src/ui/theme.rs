//! Custom theme for cliclack output

use cliclack::ThemeState;
use console::Style;

/// Theme for cliclack output: cyan while working, green once done
#[derive(Debug, Clone, Default)]
pub struct MathTheme;

impl MathTheme {
    fn state_style(state: &ThemeState, done: Style) -> Style {
        match state {
            ThemeState::Active => Style::new().cyan(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Submit => done,
        }
    }
}

impl cliclack::Theme for MathTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        Self::state_style(state, Style::new().cyan().dim())
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        Self::state_style(state, Style::new().green())
    }
}

/// Initialize the global theme
pub fn init_theme() {
    cliclack::set_theme(MathTheme);
}
