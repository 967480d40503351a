use crate::error::Error;

/// Verifies the human-check token attached to public form submissions.
pub trait CaptchaVerifier: 'static {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<bool, Error>;
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// Answers every token with the same verdict.
    pub(crate) struct FixedVerifier(pub bool);

    impl CaptchaVerifier for FixedVerifier {
        async fn verify(&self, token: &str, _remote_ip: Option<&str>) -> Result<bool, Error> {
            Ok(self.0 && !token.is_empty())
        }
    }
}
