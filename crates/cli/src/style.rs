//! Shared styling utilities for terminal output.

use console::Style;

use contactscout_core::models::SourceStage;

/// Create a success-styled string (green with checkmark).
pub fn success(msg: &str) -> String {
    let style = Style::new().green();
    format!("{} {}", style.apply_to("✓"), msg)
}

/// Create a warning-styled string (yellow).
pub fn warn(msg: &str) -> String {
    let style = Style::new().yellow();
    format!("{} {}", style.apply_to("⚠"), msg)
}

/// Create a header-styled string (bold, white).
pub fn header(msg: &str) -> String {
    let style = Style::new().bold();
    style.apply_to(msg).to_string()
}

/// Create a dim-styled string.
pub fn dim(msg: &str) -> String {
    let style = Style::new().dim();
    style.apply_to(msg).to_string()
}

/// Colored label for the stage that produced an address.
pub fn stage(stage: SourceStage) -> String {
    let style = match stage {
        SourceStage::Public => Style::new().green().bold(),
        SourceStage::Scraped => Style::new().blue().bold(),
        SourceStage::Commit => Style::new().magenta().bold(),
    };
    style.apply_to(stage.to_string()).to_string()
}

/// Yes/no indicator for the locale gate.
pub fn in_locale(yes: bool) -> String {
    if yes {
        format!("{} yes", Style::new().green().apply_to("●"))
    } else {
        format!("{} no", Style::new().dim().apply_to("○"))
    }
}
