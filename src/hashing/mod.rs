use blake3::Hasher;

/// Number of hex characters kept for a derived resource identity.
pub const RESOURCE_ID_HEX_LEN: usize = 16;

/// Number of hex characters used for a cache data file stem.
pub const FILE_STEM_HEX_LEN: usize = 32;

#[inline]
pub fn hash_cache_key(key: &str) -> [u8; 32] {
    *blake3::hash(key.as_bytes()).as_bytes()
}

/// Derives a stable identity from a resource's title and canonical URL.
///
/// The two parts are joined with a `|` separator before hashing so that
/// `("ab", "c")` and `("a", "bc")` produce different identities. The result is the
/// first [`RESOURCE_ID_HEX_LEN`] hex characters of the BLAKE3 digest (64 bits).
///
/// Unlike a time-salted id, the same title and URL always map to the same identity,
/// which is what makes repeated ratings of an unchanged resource hit the cache.
#[inline]
pub fn hash_resource_identity(title: &str, url: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(title.as_bytes());
    hasher.update(b"|");
    hasher.update(url.as_bytes());

    let hex = hasher.finalize().to_hex();
    hex.as_str()[..RESOURCE_ID_HEX_LEN].to_string()
}

/// Maps an arbitrary cache key to a filesystem-safe file stem.
///
/// Cache keys may be caller-supplied ids containing path separators or other
/// characters that are unsafe in file names; the stem is always lowercase hex.
#[inline]
pub fn cache_file_stem(key: &str) -> String {
    hash_cache_key(key)[..FILE_STEM_HEX_LEN / 2]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
