//! Server-to-client message vocabulary.
//!
//! All outbound messages are plain text, space separated, first token the
//! kind keyword.

use crate::hardware::adc::Channel;
use crate::hardware::leds::LedColor;

/// `{redled|greenled|blueled} {on|off}` — state change or snapshot line.
pub fn led_message(color: LedColor, on: bool) -> String {
    format!("{} {}", color.keyword(), if on { "on" } else { "off" })
}

/// `adc<N> <value>` — one periodic sample, value as decimal text.
pub fn adc_message(channel: Channel, value: u16) -> String {
    format!("adc{} {}", channel, value)
}

/// `hello <origin-address>` — private greeting on connect.
pub fn hello_message(origin: &str) -> String {
    format!("hello {}", origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn led_messages() {
        assert_eq!(led_message(LedColor::Red, true), "redled on");
        assert_eq!(led_message(LedColor::Blue, false), "blueled off");
    }

    #[test]
    fn adc_messages() {
        let channel = Channel::new(5).unwrap();
        assert_eq!(adc_message(channel, 1023), "adc5 1023");
        assert_eq!(adc_message(Channel::new(0).unwrap(), 0), "adc0 0");
    }

    #[test]
    fn hello_messages() {
        assert_eq!(hello_message("192.168.1.10:2001"), "hello 192.168.1.10:2001");
    }
}
