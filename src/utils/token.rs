use rand::{distributions::Alphanumeric, thread_rng, Rng};

pub const SESSION_TOKEN_LENGTH: usize = 48;

pub fn generate_session_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
