//! Transient error banner
//!
//! Every `show` hands out a fresh [`BannerTicket`]. The deferred hide only
//! takes effect for the ticket of the latest show, so an older timer that
//! fires late can never clear a newer message.

/// Identifies one `show` of the banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BannerTicket(u64);

impl BannerTicket {
    /// Returns the raw generation number
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// Banner visibility and message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Banner {
    message: String,
    visible: bool,
    generation: u64,
}

impl Banner {
    /// Creates a hidden, empty banner
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `message`, replacing whatever was displayed
    pub fn show(&mut self, message: impl Into<String>) -> BannerTicket {
        self.generation += 1;
        self.message = message.into();
        self.visible = true;
        BannerTicket(self.generation)
    }

    /// Hides the banner and invalidates every outstanding ticket
    pub fn hide(&mut self) {
        self.generation += 1;
        self.message.clear();
        self.visible = false;
    }

    /// Hides the banner if `ticket` belongs to the message on display.
    ///
    /// Returns true if the banner was hidden.
    pub fn expire(&mut self, ticket: BannerTicket) -> bool {
        if self.visible && ticket.0 == self.generation {
            self.hide();
            true
        } else {
            false
        }
    }

    /// Returns true while the banner is displayed
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns the displayed message, if any
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.visible.then_some(self.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_new_hidden() {
        let banner = Banner::new();
        assert!(!banner.is_visible());
        assert_eq!(banner.message(), None);
    }

    #[test]
    fn test_banner_show() {
        let mut banner = Banner::new();
        banner.show("Operand out of range");
        assert!(banner.is_visible());
        assert_eq!(banner.message(), Some("Operand out of range"));
    }

    #[test]
    fn test_banner_hide_clears_message() {
        let mut banner = Banner::new();
        banner.show("Invalid expression");
        banner.hide();
        assert!(!banner.is_visible());
        assert_eq!(banner.message(), None);
    }

    #[test]
    fn test_banner_expire_current_ticket() {
        let mut banner = Banner::new();
        let ticket = banner.show("Invalid expression");
        assert!(banner.expire(ticket));
        assert!(!banner.is_visible());
    }

    #[test]
    fn test_banner_stale_ticket_does_not_hide_newer_message() {
        let mut banner = Banner::new();
        let first = banner.show("Operand out of range");
        let second = banner.show("Error: Divide by zero");

        assert!(!banner.expire(first));
        assert_eq!(banner.message(), Some("Error: Divide by zero"));

        assert!(banner.expire(second));
        assert!(!banner.is_visible());
    }

    #[test]
    fn test_banner_hide_invalidates_tickets() {
        let mut banner = Banner::new();
        let ticket = banner.show("Invalid expression");
        banner.hide();
        let newer = banner.show("Operand out of range");
        assert!(!banner.expire(ticket));
        assert!(banner.is_visible());
        assert!(newer.generation() > ticket.generation());
    }

    #[test]
    fn test_banner_expire_twice_is_noop() {
        let mut banner = Banner::new();
        let ticket = banner.show("Invalid expression");
        assert!(banner.expire(ticket));
        assert!(!banner.expire(ticket));
    }
}
