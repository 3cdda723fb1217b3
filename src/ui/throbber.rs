//! Spinner and waiting copy shown while tasks are being generated.

/// Braille spinner characters for animated loading indicators.
const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

const WAITING_MESSAGES: [&str; 6] = [
    "Reading your interests...",
    "Matching tasks to your pillars...",
    "Drafting challenges...",
    "Balancing XP rewards...",
    "Checking the rubric...",
    "Almost there...",
];

/// Spinner frame for `now_ms`; advances every 100ms.
pub fn spinner_char(now_ms: u64) -> char {
    SPINNER[((now_ms / 100) % SPINNER.len() as u64) as usize]
}

/// Message that rotates every two seconds.
pub fn waiting_message(now_ms: u64) -> &'static str {
    WAITING_MESSAGES[((now_ms / 2000) % WAITING_MESSAGES.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner_char(0), '⠋');
        assert_eq!(spinner_char(150), '⠙');
        assert_eq!(spinner_char(1000), '⠋');
    }

    #[test]
    fn test_waiting_message_stable_within_window() {
        assert_eq!(waiting_message(0), waiting_message(1999));
        assert_ne!(waiting_message(0), waiting_message(2000));
    }
}
