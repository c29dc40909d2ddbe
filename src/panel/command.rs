//! Inbound command parsing.
//!
//! Client text is parsed at the boundary into a closed set of actions.
//! Matching is case-insensitive and exact on the token sequence; anything
//! unmatched is not an error but an explicit pass-through for echoing.

use crate::hardware::leds::LedColor;

/// What to do with one LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedAction {
    /// Invert the current pin level ("clicked").
    Toggle,
    /// Drive the pin high.
    On,
    /// Drive the pin low.
    Off,
}

/// Which interval a rate command adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateKind {
    /// The diagnostic flash interval.
    Flash,
    /// The analog scan interval.
    Refresh,
}

/// Speed up or slow down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDirection {
    Up,
    Down,
}

/// One parsed client message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A recognized LED command.
    Led { color: LedColor, action: LedAction },
    /// A recognized rate-adjustment command.
    Rate {
        kind: RateKind,
        direction: RateDirection,
    },
    /// Anything else, echoed verbatim to all clients.
    Passthrough(String),
}

impl Command {
    /// Parse one inbound text message. Never fails: unrecognized text
    /// becomes [`Command::Passthrough`] carrying the original, unlowered
    /// string.
    pub fn parse(text: &str) -> Command {
        let lowered = text.to_ascii_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();

        let color = match tokens.first() {
            Some(&"redled") => Some(LedColor::Red),
            Some(&"greenled") => Some(LedColor::Green),
            Some(&"blueled") => Some(LedColor::Blue),
            _ => None,
        };
        if let Some(color) = color {
            let action = match tokens.as_slice() {
                [_, "clicked"] => Some(LedAction::Toggle),
                [_, "on"] => Some(LedAction::On),
                [_, "off"] => Some(LedAction::Off),
                _ => None,
            };
            if let Some(action) = action {
                return Command::Led { color, action };
            }
        }

        let rate = match tokens.as_slice() {
            ["flash", "rate", dir] => Some((RateKind::Flash, *dir)),
            ["refresh", "rate", dir] => Some((RateKind::Refresh, *dir)),
            _ => None,
        };
        if let Some((kind, dir)) = rate {
            let direction = match dir {
                "up" => Some(RateDirection::Up),
                "down" => Some(RateDirection::Down),
                _ => None,
            };
            if let Some(direction) = direction {
                return Command::Rate { kind, direction };
            }
        }

        Command::Passthrough(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_led_clicks() {
        assert_eq!(
            Command::parse("redled clicked"),
            Command::Led {
                color: LedColor::Red,
                action: LedAction::Toggle
            }
        );
        assert_eq!(
            Command::parse("blueled off"),
            Command::Led {
                color: LedColor::Blue,
                action: LedAction::Off
            }
        );
        assert_eq!(
            Command::parse("greenled on"),
            Command::Led {
                color: LedColor::Green,
                action: LedAction::On
            }
        );
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(
            Command::parse("RedLed Clicked"),
            Command::Led {
                color: LedColor::Red,
                action: LedAction::Toggle
            }
        );
        assert_eq!(
            Command::parse("FLASH RATE UP"),
            Command::Rate {
                kind: RateKind::Flash,
                direction: RateDirection::Up
            }
        );
    }

    #[test]
    fn parses_rate_commands() {
        assert_eq!(
            Command::parse("flash rate down"),
            Command::Rate {
                kind: RateKind::Flash,
                direction: RateDirection::Down
            }
        );
        assert_eq!(
            Command::parse("refresh rate up"),
            Command::Rate {
                kind: RateKind::Refresh,
                direction: RateDirection::Up
            }
        );
    }

    #[test]
    fn unmatched_text_passes_through_unmodified() {
        assert_eq!(
            Command::parse("Foo Bar"),
            Command::Passthrough("Foo Bar".to_string())
        );
        // Extra tokens break the exact-literal match.
        assert_eq!(
            Command::parse("redled clicked twice"),
            Command::Passthrough("redled clicked twice".to_string())
        );
        assert_eq!(
            Command::parse("redled blink"),
            Command::Passthrough("redled blink".to_string())
        );
        assert_eq!(
            Command::parse("flash rate sideways"),
            Command::Passthrough("flash rate sideways".to_string())
        );
        assert_eq!(Command::parse(""), Command::Passthrough(String::new()));
    }
}
