use rand::Rng;

const SECRET_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a random alphanumeric secret of the given length
pub fn create_random_secret(secret_len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..secret_len)
        .map(|_| {
            let idx = rng.gen_range(0..SECRET_CHARSET.len());
            SECRET_CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_creates_secret_of_wanted_length() {
        for len in &[0, 1, 16, 30] {
            assert_eq!(create_random_secret(*len).len(), *len);
        }
    }

    #[test]
    fn secrets_are_unlikely_to_collide() {
        assert_ne!(create_random_secret(30), create_random_secret(30));
    }
}
