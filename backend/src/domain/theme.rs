//! CSS custom property lookup.
//!
//! Pages rendered by this service never run inside a browser, so the
//! server always passes `None` for the environment and receives the
//! fallback. The trait keeps the lookup usable from any host that can
//! compute styles.

/// A host able to report computed styles of the document root.
pub trait RenderEnvironment {
    /// Raw computed value of `property` on the root element.
    fn root_property(&self, property: &str) -> Option<String>;
}

/// Read the CSS variable `name` from the root element.
///
/// Returns `fallback` verbatim without an environment or when the trimmed
/// value is empty.
///
/// # Examples
/// ```
/// use portal_backend::domain::read_css_variable;
///
/// assert_eq!(read_css_variable(None, "--brand", " #fff "), " #fff ");
/// ```
pub fn read_css_variable(
    environment: Option<&dyn RenderEnvironment>,
    name: &str,
    fallback: &str,
) -> String {
    environment
        .and_then(|env| env.root_property(name))
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    struct StaticStyles(HashMap<&'static str, &'static str>);

    impl RenderEnvironment for StaticStyles {
        fn root_property(&self, property: &str) -> Option<String> {
            self.0.get(property).map(|value| (*value).to_owned())
        }
    }

    fn styles() -> StaticStyles {
        StaticStyles(HashMap::from([
            ("--brand", "  #0f172a "),
            ("--blank", "   "),
        ]))
    }

    #[rstest]
    fn server_context_returns_fallback() {
        assert_eq!(read_css_variable(None, "--brand", "#000"), "#000");
    }

    #[rstest]
    #[case("--brand", "#0f172a")]
    #[case("--blank", "#000")]
    #[case("--missing", "#000")]
    fn rendering_environment_values_are_trimmed(#[case] name: &str, #[case] expected: &str) {
        let env = styles();
        assert_eq!(read_css_variable(Some(&env), name, "#000"), expected);
    }
}
