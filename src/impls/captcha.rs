pub mod turnstile;
