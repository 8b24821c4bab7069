//! Deterministic fingerprints for artifact payloads.
//!
//! The value only identifies which bytes were loaded; it is not an integrity
//! guarantee.

/// 32-bit FNV-1a hash state.
#[derive(Copy, Clone, Debug)]
pub struct Fingerprint(u32);

impl Fingerprint {
    /// Create a new hash state with the FNV offset basis.
    pub fn new() -> Self {
        Self(216_613_626_1)
    }

    /// Fingerprint a complete payload in one call.
    pub fn of(bytes: &[u8]) -> Self {
        let mut fp = Self::new();
        fp.update(bytes);
        fp
    }

    /// Feed bytes into the hash function.
    pub fn update(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 = (self.0 ^ (*b as u32)).wrapping_mul(16_777_619);
        }
    }

    pub fn finish32(&self) -> u32 {
        self.0
    }

    /// Finalise the hash and return an 8-character lowercase hex string.
    pub fn finish_hex(&self) -> String {
        format!("{:08x}", self.0)
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_the_offset_basis() {
        assert_eq!(Fingerprint::of(b"").finish32(), 0x811c_9dc5);
    }

    #[test]
    fn matches_reference_fnv1a() {
        assert_eq!(Fingerprint::of(b"a").finish_hex(), "e40c292c");
        assert_eq!(Fingerprint::of(b"{\"mean\":[1.0]}").finish_hex(), "1aff751d");
    }

    #[test]
    fn incremental_updates_match_one_shot() {
        let mut fp = Fingerprint::new();
        fp.update(b"{\"mean\":");
        fp.update(b"[1.0]}");
        assert_eq!(fp.finish32(), Fingerprint::of(b"{\"mean\":[1.0]}").finish32());
    }
}
