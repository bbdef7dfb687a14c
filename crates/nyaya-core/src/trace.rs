//! Client-side correlation tokens.
//!
//! Format: `<prefix><unix millis>_<9 base36 chars>`, e.g.
//! `frontend_1760700000000_k3j9x0q2a`.

use rand::Rng;

/// Prefix for trace ids generated by this client.
pub const DEFAULT_TRACE_PREFIX: &str = "frontend_";

/// Prefix the demo/mock backend puts on its trace ids. Feedback for these is
/// never sent.
pub const MOCK_TRACE_PREFIX: &str = "mock_";

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random lowercase base36 string of `len` characters.
pub fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// `<prefix><millis>_<suffix>`.
pub fn generate_token(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    format!("{prefix}{millis}_{}", random_suffix(SUFFIX_LEN))
}

/// Fresh trace id for the `X-Trace-ID` header.
pub fn generate_trace_id(prefix: &str) -> String {
    generate_token(prefix)
}

/// Trace id in the shape the mock backend hands out.
pub fn generate_mock_trace_id() -> String {
    format!("{MOCK_TRACE_PREFIX}{}", chrono::Utc::now().timestamp_millis())
}

pub fn is_mock_trace_id(trace_id: &str) -> bool {
    trace_id.starts_with(MOCK_TRACE_PREFIX)
}
