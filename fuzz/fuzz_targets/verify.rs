//! Fuzz target for token verification.
//!
//! Feeds arbitrary tokens, session ids and clocks to `verify` and checks that
//! nothing panics and that only tokens issued with the secret are accepted.

#![no_main]

use arbitrary::Arbitrary;
use chrono::{DateTime, TimeZone, Utc};
use libfuzzer_sys::fuzz_target;

const SECRET: &str = "fuzzing-secret";

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    /// Raw token from the client
    token: String,
    session_id: String,
    now_secs: i32,
    now_nanos: u32,
}

fuzz_target!(|input: FuzzInput| {
    let now: DateTime<Utc> = match Utc
        .timestamp_opt(i64::from(input.now_secs), input.now_nanos % 1_000_000_000)
        .single()
    {
        Some(now) => now,
        None => return,
    };

    if hmac_csrf::verify(&input.token, &input.session_id, now, SECRET) {
        // Anything accepted must be exactly what we would have issued.
        let (_, timestamp) = input.token.split_once('.').unwrap();
        let expire_at = timestamp.parse::<i64>().unwrap();
        let reissued = Utc
            .timestamp_opt(expire_at, 0)
            .single()
            .map(|at| hmac_csrf::issue(&input.session_id, at, SECRET));
        assert_eq!(reissued.as_deref(), Some(input.token.as_str()));
    }
});
