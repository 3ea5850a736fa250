//! Site characteristics and domain constants.

/// E-Hentai API characteristics.
pub mod site {
    /// Bulk metadata endpoint. Serves gallery metadata for both e-hentai
    /// and exhentai galleries.
    pub const API_URL: &str = "https://api.e-hentai.org/api.php";

    /// Maximum number of galleries the gdata method accepts per request.
    pub const GDATA_BATCH_SIZE: usize = 25;

    /// Namespace field expected by the gdata method.
    pub const GDATA_NAMESPACE: u32 = 1;

    /// Session cookie names checked by the favorites listing.
    pub const COOKIE_MEMBER_ID: &str = "ipb_member_id";
    pub const COOKIE_PASS_HASH: &str = "ipb_pass_hash";
    pub const COOKIE_IGNEOUS: &str = "igneous";
}
