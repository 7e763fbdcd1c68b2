use std::collections::HashSet;

use tokio::time::Instant;

/// Shared quiet-period guard across both lanes.
///
/// While `active`, no new submission is accepted. The guard is armed when a
/// scan is accepted and released a fixed delay after the remote call
/// resolves. Resolution always happens: the coordinator runs the call on
/// its own task, so there is no path that engages without a later
/// `release_at`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CooldownState {
    active: bool,
    last_barcode: String,
    expiry: Option<Instant>,
}

impl CooldownState {
    /// Enter the critical section for `barcode`. No expiry is set until the
    /// remote call resolves.
    pub fn engage(&mut self, barcode: &str) {
        self.active = true;
        self.last_barcode.clear();
        self.last_barcode.push_str(barcode);
        self.expiry = None;
    }

    /// Schedule the release.
    pub fn release_at(&mut self, expiry: Instant) {
        self.expiry = Some(expiry);
    }

    /// Returns the released barcode if the expiry has passed.
    pub fn release_if_expired(&mut self, now: Instant) -> Option<String> {
        match self.expiry {
            Some(expiry) if now >= expiry => {
                self.active = false;
                self.expiry = None;
                Some(std::mem::take(&mut self.last_barcode))
            }
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_barcode(&self) -> &str {
        &self.last_barcode
    }

}

/// Barcodes with an accepted submission that has not been released yet.
#[derive(Clone, Debug, Default)]
pub struct ProcessedBarcodeRegistry {
    barcodes: HashSet<String>,
}

impl ProcessedBarcodeRegistry {
    /// Returns `false` if the barcode was already marked.
    pub fn mark(&mut self, barcode: &str) -> bool {
        self.barcodes.insert(barcode.to_string())
    }

    pub fn release(&mut self, barcode: &str) -> bool {
        self.barcodes.remove(barcode)
    }

    pub fn contains(&self, barcode: &str) -> bool {
        self.barcodes.contains(barcode)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn stays_engaged_until_release_is_scheduled() {
        let mut c = CooldownState::default();
        c.engage("998877");
        assert!(c.is_active());
        assert_eq!(c.last_barcode(), "998877");
        let far = Instant::now() + Duration::from_secs(3600);
        assert_eq!(c.release_if_expired(far), None);
        assert!(c.is_active());
    }

    #[test]
    fn releases_after_expiry() {
        let now = Instant::now();
        let mut c = CooldownState::default();
        c.engage("998877");
        c.release_at(now + Duration::from_millis(300));

        assert_eq!(c.release_if_expired(now + Duration::from_millis(299)), None);
        assert_eq!(
            c.release_if_expired(now + Duration::from_millis(300)),
            Some("998877".to_string())
        );
        assert_eq!(c, CooldownState::default());
    }

    #[test]
    fn registry_marks_once() {
        let mut r = ProcessedBarcodeRegistry::default();
        assert!(r.mark("A"));
        assert!(!r.mark("A"));
        assert!(r.contains("A"));
        assert!(r.release("A"));
        assert!(!r.release("A"));
        assert!(!r.contains("A"));
    }
}
