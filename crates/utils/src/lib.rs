use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Generates an alphanumeric secret of the given length, used for
/// webhook signing keys when the operator has not provided one.
pub fn create_random_secret(secret_len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(secret_len)
        .map(char::from)
        .collect()
}
