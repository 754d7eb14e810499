use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Command-line configuration errors. These indicate a misconfigured
/// analysis and abort the run immediately.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Parse a comma-separated list of floats, e.g. "0,0.1"
pub fn parse_f64_list(s: &str) -> Result<Vec<f64>, CliError> {
    s.split(',')
        .map(|tok| {
            tok.trim().parse::<f64>().map_err(|_| {
                CliError::Configuration(format!("Malformed number '{}' in list '{}'", tok, s))
            })
        })
        .collect()
}

/// Parse a comma-separated list of integers, e.g. "8,16,32"
pub fn parse_usize_list(s: &str) -> Result<Vec<usize>, CliError> {
    s.split(',')
        .map(|tok| {
            tok.trim().parse::<usize>().map_err(|_| {
                CliError::Configuration(format!("Malformed integer '{}' in list '{}'", tok, s))
            })
        })
        .collect()
}

/// Named options parsed from `--key value` and `--flag` tokens
#[derive(Debug, Default)]
pub struct CliArgs {
    pub flags: Vec<String>,
    pub values: HashMap<String, String>,
}

impl CliArgs {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, CliError> {
        let toks: Vec<String> = args.into_iter().collect();
        let mut flags = Vec::new();
        let mut values = HashMap::new();
        let mut i = 0;
        while i < toks.len() {
            let name = toks[i].strip_prefix("--").ok_or_else(|| {
                CliError::Configuration(format!("Unexpected token '{}'", toks[i]))
            })?;
            if i + 1 < toks.len() && !toks[i + 1].starts_with("--") {
                values.insert(name.to_string(), toks[i + 1].clone());
                i += 2;
            } else {
                flags.push(name.to_string());
                i += 1;
            }
        }
        Ok(Self { flags, values })
    }

    pub fn has(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|s| s.as_str())
    }

    /// Typed access to a value option; absent options return `Ok(None)`
    pub fn get_parsed<T: FromStr>(&self, name: &str) -> Result<Option<T>, CliError> {
        match self.get(name) {
            None => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
                CliError::Configuration(format!("Malformed value '{}' for --{}", raw, name))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_parsing() {
        assert_eq!(parse_f64_list("0,0.1").unwrap(), vec![0.0, 0.1]);
        assert_eq!(parse_usize_list("8, 16,32").unwrap(), vec![8, 16, 32]);
        assert!(parse_f64_list("0,abc").is_err());
        assert!(parse_usize_list("8,,16").is_err());
    }

    #[test]
    fn test_args_flags_and_values() {
        let args = CliArgs::parse(
            ["--plot", "--Ns", "8,16", "--atol", "1e-8", "--verbose"]
                .iter()
                .map(|s| s.to_string()),
        )
        .unwrap();
        assert!(args.has("plot"));
        assert!(args.has("verbose"));
        assert_eq!(args.get("Ns"), Some("8,16"));
        assert_eq!(args.get_parsed::<f64>("atol").unwrap(), Some(1e-8));
        assert_eq!(args.get_parsed::<f64>("rtol").unwrap(), None);
        assert!(args.get_parsed::<usize>("Ns").is_err());
    }

    #[test]
    fn test_args_reject_stray_token() {
        let res = CliArgs::parse(["oops".to_string()]);
        assert!(matches!(res, Err(CliError::Configuration(_))));
    }
}
