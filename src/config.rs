//! 생성 서비스 설정
//!
//! API 키와 모델 설정은 프로세스 환경 변수에서 읽습니다.
//! 개발 환경에서는 `.env.local`을 먼저 로드합니다.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::IdeaError;

/// API 키 조회 우선순위
pub const API_KEY_VARS: [&str; 3] = ["GEMINI_API_KEY", "API_KEY", "VITE_GEMINI_API_KEY"];

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini 생성 서비스 설정
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub request_timeout: Duration,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// 프로세스 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, IdeaError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정 로드 (빈 문자열은 미설정으로 취급)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IdeaError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = API_KEY_VARS
            .iter()
            .find_map(|key| get(*key))
            .ok_or_else(|| {
                IdeaError::Configuration(
                    "Thiếu khóa API Gemini. Hãy đặt GEMINI_API_KEY trong .env.local".to_string(),
                )
            })?;

        let mut config = Self::new(api_key);
        if let Some(model) = get("GEMINI_MODEL") {
            config.model = model;
        }
        if let Some(base) = get("GEMINI_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(raw) = get("GEMINI_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                IdeaError::Configuration(format!(
                    "GEMINI_TIMEOUT_SECS phải là số nguyên dương, nhận được '{}'",
                    raw
                ))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn is_valid_env_key(key: &str) -> bool {
    if key.is_empty() {
        return false;
    }
    key.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// `KEY=VALUE` 라인만 골라내는 관대한 파서.
/// 주석, 코드펜스, 설명 문장은 건너뜁니다.
pub fn parse_env_lenient(text: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("```") {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line).trim();
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };
        let key = k.trim();
        if !is_valid_env_key(key) {
            continue;
        }

        let mut value = v.trim().to_string();
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = value[1..value.len() - 1].to_string();
        }

        pairs.push((key.to_string(), value));
    }

    pairs
}

/// 관대한 파서로 읽은 값을 환경 변수에 반영.
/// 이미 비어있지 않은 값이 있으면 덮어쓰지 않습니다.
pub fn try_load_env_lenient(path: &Path) -> std::io::Result<usize> {
    let text = std::fs::read_to_string(path)?;
    let mut loaded = 0usize;

    for (key, value) in parse_env_lenient(&text) {
        if let Ok(existing) = std::env::var(&key) {
            if !existing.trim().is_empty() {
                continue;
            }
        }
        std::env::set_var(&key, value);
        loaded += 1;
    }

    Ok(loaded)
}

pub fn find_upwards(start: PathBuf, filename: &str, max_hops: usize) -> Option<PathBuf> {
    let mut cur = start;
    for _ in 0..=max_hops {
        let candidate = cur.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
        if !cur.pop() {
            break;
        }
    }
    None
}

/// `.env.local` → `.env` 순서로 환경 파일 로드. 파일이 없어도 실패하지 않습니다.
pub fn load_env_files() {
    load_env_local();
    if dotenvy::dotenv().is_ok() {
        debug!("Loaded .env");
    }
}

fn load_env_local() {
    if dotenvy::from_filename(".env.local").is_ok() {
        debug!("Loaded .env.local from current directory");
        return;
    }

    let mut candidates: Vec<PathBuf> = vec![];
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_upwards(cwd, ".env.local", 6) {
            candidates.push(p);
        }
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(p) = find_upwards(dir.to_path_buf(), ".env.local", 8) {
                candidates.push(p);
            }
        }
    }

    for p in candidates {
        if dotenvy::from_path(&p).is_ok() {
            debug!("Loaded {}", p.display());
            return;
        }
        match try_load_env_lenient(&p) {
            Ok(loaded) if loaded > 0 => {
                debug!("Loaded {} entries leniently from {}", loaded, p.display());
                return;
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to read {}: {}", p.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let result = GeminiConfig::from_lookup(lookup_from(&[("GEMINI_MODEL", "x")]));
        assert!(matches!(result, Err(IdeaError::Configuration(_))));
    }

    #[test]
    fn test_blank_key_falls_through_to_next_var() {
        let config =
            GeminiConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  "), ("API_KEY", "k-2")]))
                .unwrap();
        assert_eq!(config.api_key, "k-2");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_overrides() {
        let config = GeminiConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k-1"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("GEMINI_API_BASE", "http://localhost:8080/v1beta/"),
            ("GEMINI_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.api_base, "http://localhost:8080/v1beta");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_timeout() {
        let result = GeminiConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k-1"),
            ("GEMINI_TIMEOUT_SECS", "0"),
        ]));
        assert!(matches!(result, Err(IdeaError::Configuration(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GeminiConfig::new("super-secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
    }

    #[test]
    fn test_parse_env_lenient_skips_noise() {
        let text = "# 설정\n```bash\nexport GEMINI_API_KEY=\"abc\"\nsome prose = here\nGEMINI_MODEL='m'\n```\n";
        let pairs = parse_env_lenient(text);
        assert_eq!(
            pairs,
            vec![
                ("GEMINI_API_KEY".to_string(), "abc".to_string()),
                ("GEMINI_MODEL".to_string(), "m".to_string()),
            ]
        );
    }

    #[test]
    fn test_lenient_load_and_find_upwards() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        let env_path = dir.path().join(".env.local");
        std::fs::write(&env_path, "```\nIDEA_MATRIX_TEST_LENIENT_KEY=loaded\n```\n").unwrap();

        let found = find_upwards(nested, ".env.local", 4).unwrap();
        assert_eq!(found, env_path);

        let loaded = try_load_env_lenient(&found).unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(std::env::var("IDEA_MATRIX_TEST_LENIENT_KEY").unwrap(), "loaded");
    }
}
