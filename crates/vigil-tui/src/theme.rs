//! Color palette for the VIGIL TUI.

use ratatui::style::Color;

use vigil_core::HealthBucket;

/// Colors used across the dashboard.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Titles and focused borders
    pub header: Color,
    /// Normal text
    pub text: Color,
    /// Secondary text (timestamps, hints)
    pub text_dim: Color,
    /// Unfocused borders
    pub border_dim: Color,
    /// Accent (chart line, selection)
    pub accent: Color,
    /// Healthy status
    pub healthy: Color,
    /// Unhealthy status
    pub unhealthy: Color,
    /// Pending/unknown status
    pub pending: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header: Color::Cyan,
            text: Color::White,
            text_dim: Color::DarkGray,
            border_dim: Color::DarkGray,
            accent: Color::Cyan,
            healthy: Color::Green,
            unhealthy: Color::Red,
            pending: Color::Yellow,
        }
    }
}

impl Theme {
    /// Color for a health bucket's badge and dot.
    pub fn bucket_color(&self, bucket: HealthBucket) -> Color {
        match bucket {
            HealthBucket::Healthy => self.healthy,
            HealthBucket::Unhealthy => self.unhealthy,
            HealthBucket::Pending => self.pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_colors_are_distinct() {
        let theme = Theme::default();
        assert_ne!(
            theme.bucket_color(HealthBucket::Healthy),
            theme.bucket_color(HealthBucket::Unhealthy)
        );
        assert_ne!(
            theme.bucket_color(HealthBucket::Healthy),
            theme.bucket_color(HealthBucket::Pending)
        );
    }
}
