//! URL generation: expands parameter lists into the ordered list of targets.
//!
//! Pure and deterministic. Order is codes outermost, then seasons, years,
//! paper types, component numbers, and time zones innermost, so identical
//! input always yields the identical dispatch order.

use std::path::{Path, PathBuf};

use crate::params::{ConfigError, PaperParams};

/// Host and path prefix papers are served from.
pub const DEFAULT_BASE_URL: &str = "https://cie.fraft.cn/obj/Fetch/redir/";

/// Fixed file-name pattern under a base URL:
/// `{code}_{season}{year}_{paper_type}_{component_number}{time_zone}.pdf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    base: String,
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl UrlTemplate {
    /// Builds a template rooted at `base`, which must be an absolute http(s) URL.
    /// A trailing `/` is added when missing.
    pub fn new(base: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
            url: base.to_string(),
            reason: reason.to_string(),
        };
        let parsed = url::Url::parse(base).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed"));
        }
        let mut base = parsed.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Renders the URL for one parameter combination.
    pub fn render(
        &self,
        code: &str,
        season: &str,
        year: &str,
        paper_type: &str,
        component_number: &str,
        time_zone: &str,
    ) -> String {
        format!(
            "{}{}_{}{}_{}_{}{}.pdf",
            self.base, code, season, year, paper_type, component_number, time_zone
        )
    }
}

/// One URL to fetch and the directory its file goes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub url: String,
    pub destination: PathBuf,
}

/// Expands `params` into one target per combination, in nested iteration order.
///
/// Empty or malformed lists are rejected up front: an empty list would
/// silently produce no work.
pub fn generate(
    params: &PaperParams,
    template: &UrlTemplate,
    destination: &Path,
) -> Result<Vec<Target>, ConfigError> {
    params.validate()?;

    let mut targets = Vec::with_capacity(params.combinations());
    for code in &params.codes {
        for season in &params.seasons {
            for year in &params.years {
                for paper_type in &params.paper_types {
                    for component in &params.component_numbers {
                        for zone in &params.time_zones {
                            targets.push(Target {
                                url: template
                                    .render(code, season, year, paper_type, component, zone),
                                destination: destination.to_path_buf(),
                            });
                        }
                    }
                }
            }
        }
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> PaperParams {
        PaperParams {
            codes: list(&["9701", "9702"]),
            seasons: list(&["s", "w", "m"]),
            years: list(&["22"]),
            paper_types: list(&["qp", "ms"]),
            component_numbers: list(&["1"]),
            time_zones: list(&["1", "2"]),
        }
    }

    #[test]
    fn single_combination_matches_template() {
        let targets = generate(
            &PaperParams::default(),
            &UrlTemplate::default(),
            Path::new("downloads"),
        )
        .unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(
            targets[0].url,
            "https://cie.fraft.cn/obj/Fetch/redir/9701_s23_qp_21.pdf"
        );
        assert_eq!(targets[0].destination, PathBuf::from("downloads"));
    }

    #[test]
    fn count_is_product_and_urls_are_well_formed() {
        let params = sample();
        let targets = generate(&params, &UrlTemplate::default(), Path::new("out")).unwrap();
        assert_eq!(targets.len(), 2 * 3 * 2 * 2);
        for t in &targets {
            let parsed = url::Url::parse(&t.url).expect("absolute URL");
            assert_eq!(parsed.host_str(), Some("cie.fraft.cn"));
            assert!(parsed.path().starts_with("/obj/Fetch/redir/"));
            assert!(parsed.path().ends_with(".pdf"));
        }
    }

    #[test]
    fn nested_order_codes_outermost_time_zones_innermost() {
        let targets = generate(&sample(), &UrlTemplate::default(), Path::new("out")).unwrap();
        let names: Vec<&str> = targets
            .iter()
            .map(|t| t.url.rsplit('/').next().unwrap())
            .collect();
        assert_eq!(names[0], "9701_s22_qp_11.pdf");
        assert_eq!(names[1], "9701_s22_qp_12.pdf");
        assert_eq!(names[2], "9701_s22_ms_11.pdf");
        assert_eq!(names[4], "9701_w22_qp_11.pdf");
        assert_eq!(names[12], "9702_s22_qp_11.pdf");
        assert_eq!(*names.last().unwrap(), "9702_m22_ms_12.pdf");
    }

    #[test]
    fn generation_is_deterministic() {
        let template = UrlTemplate::default();
        let a = generate(&sample(), &template, Path::new("out")).unwrap();
        let b = generate(&sample(), &template, Path::new("out")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_list_fails_fast() {
        let params = PaperParams {
            paper_types: Vec::new(),
            ..sample()
        };
        assert_eq!(
            generate(&params, &UrlTemplate::default(), Path::new("out")),
            Err(ConfigError::EmptyList {
                field: "paper_types"
            })
        );
    }

    #[test]
    fn duplicates_are_kept_as_independent_targets() {
        let params = PaperParams {
            codes: list(&["9701", "9701"]),
            ..PaperParams::default()
        };
        let targets = generate(&params, &UrlTemplate::default(), Path::new("out")).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0], targets[1]);
    }

    #[test]
    fn custom_base_gets_trailing_slash() {
        let template = UrlTemplate::new("http://127.0.0.1:8080/papers").unwrap();
        assert_eq!(template.base(), "http://127.0.0.1:8080/papers/");
        assert_eq!(
            template.render("9709", "w", "21", "ms", "3", "2"),
            "http://127.0.0.1:8080/papers/9709_w21_ms_32.pdf"
        );
    }

    #[test]
    fn bad_base_urls_are_rejected() {
        for base in ["not a url", "ftp://example.com/", "https://example.com/?q=1"] {
            assert!(
                matches!(
                    UrlTemplate::new(base),
                    Err(ConfigError::InvalidBaseUrl { .. })
                ),
                "{base} should be rejected"
            );
        }
    }
}
