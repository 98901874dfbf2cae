use sha2::Digest;

pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> Vec<u8>;

    /// Lowercase hex encoding of [`Hasher::finalize`].
    fn finalize_hex(self) -> String
    where
        Self: Sized,
    {
        hex::encode(self.finalize())
    }
}

pub struct Sha256Hasher(sha2::Sha256);

impl Hasher for Sha256Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }

    fn finalize(self) -> Vec<u8> { self.0.finalize().to_vec() }
}

impl Default for Sha256Hasher {
    fn default() -> Self { Self::new() }
}

impl Sha256Hasher {
    pub fn new() -> Self { Self(sha2::Sha256::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { sha2::Sha256::digest(data).to_vec() }

    pub fn hex_digest(data: &[u8]) -> String { hex::encode(Self::digest(data)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_WORLD: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_sha256_hasher() {
        let mut hasher = Sha256Hasher::new();
        hasher.update(b"hello world");
        assert_eq!(hasher.finalize_hex(), HELLO_WORLD);
    }

    #[test]
    fn test_incremental_matches_oneshot() {
        let data: Vec<u8> = (0..=255u8).cycle().take(100_000).collect();

        let mut hasher = Sha256Hasher::new();
        for chunk in data.chunks(8192) {
            hasher.update(chunk);
        }

        assert_eq!(hasher.finalize(), Sha256Hasher::digest(&data));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            Sha256Hasher::hex_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
