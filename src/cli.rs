//! Command-line flags of the form `--name=value`.

/// Deal seed from `--seed=N`, for reproducible card layouts.
pub fn seed() -> Option<u64> {
    flag_value(std::env::args(), "--seed=")
}

/// Bevy Remote Protocol port from `--brp-port=N`.
#[cfg(feature = "dev_native")]
pub fn brp_port() -> Option<u16> {
    flag_value(std::env::args(), "--brp-port=")
}

fn flag_value<T: std::str::FromStr>(
    args: impl IntoIterator<Item = String>,
    prefix: &str,
) -> Option<T> {
    args.into_iter()
        .find(|arg| arg.starts_with(prefix))
        .and_then(|arg| arg.strip_prefix(prefix).map(|s| s.to_string()))
        .and_then(|value| value.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_matching_flag() {
        let value: Option<u64> = flag_value(args(&["pairs", "--seed=42"]), "--seed=");
        assert_eq!(value, Some(42));
    }

    #[test]
    fn missing_or_malformed_flag_is_none() {
        let missing: Option<u64> = flag_value(args(&["pairs"]), "--seed=");
        assert_eq!(missing, None);

        let malformed: Option<u64> = flag_value(args(&["pairs", "--seed=abc"]), "--seed=");
        assert_eq!(malformed, None);
    }

    #[test]
    fn first_occurrence_wins() {
        let value: Option<u16> = flag_value(
            args(&["pairs", "--brp-port=1000", "--brp-port=2000"]),
            "--brp-port=",
        );
        assert_eq!(value, Some(1000));
    }
}
