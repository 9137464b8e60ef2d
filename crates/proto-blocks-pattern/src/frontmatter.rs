//! The YAML header of a pattern page.
//!
//! A header is delimited by lines consisting of exactly `---`. It names the page,
//! places it in the navigation, and can force every block on the page into
//! preview mode.

use serde::Deserialize;

const DELIMITER: &str = "---";

/// Page settings declared in a pattern's header.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Frontmatter {
    pub title: String,
    pub description: Option<String>,
    /// Navigation position; lower sorts first
    pub order: Option<i32>,
    /// Listed in the navigation
    pub nav: bool,
    /// Output location relative to the site root, normalized to `a/b` form
    pub slug: Option<String>,
    /// Render every block on the page as an editor placeholder
    pub preview: bool,
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            order: None,
            nav: true,
            slug: None,
            preview: false,
        }
    }
}

/// A pattern page split into its header and markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct Split<'a> {
    pub frontmatter: Option<Frontmatter>,
    pub body: &'a str,
    /// Number of source lines before `body`
    pub body_line: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Header opened on line {0} is never closed with ---")]
    Unclosed(usize),

    #[error("Invalid YAML in header: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("Header has no title")]
    MissingTitle,

    #[error("Invalid slug {0:?}: segments may not be `..` or contain a backslash")]
    InvalidSlug(String),
}

/// Split a pattern page into its header and body.
///
/// Blank lines before the opening delimiter are skipped. A page without a header
/// is returned whole.
pub fn split_frontmatter(source: &str) -> Result<Split<'_>, FrontmatterError> {
    let mut offset = 0;
    let mut line_no = 0;
    let mut lines = source.split_inclusive('\n');

    let opened_at = loop {
        let Some(line) = lines.next() else {
            return Ok(no_header(source));
        };
        offset += line.len();
        line_no += 1;

        match line.trim_end() {
            "" => continue,
            DELIMITER => break line_no,
            _ => return Ok(no_header(source)),
        }
    };

    let yaml_start = offset;
    for line in lines {
        let line_start = offset;
        offset += line.len();
        line_no += 1;

        if line.trim_end() == DELIMITER {
            let frontmatter = parse_header(&source[yaml_start..line_start])?;
            return Ok(Split {
                frontmatter: Some(frontmatter),
                body: &source[offset..],
                body_line: line_no,
            });
        }
    }

    Err(FrontmatterError::Unclosed(opened_at))
}

fn no_header(source: &str) -> Split<'_> {
    Split {
        frontmatter: None,
        body: source,
        body_line: 0,
    }
}

fn parse_header(yaml: &str) -> Result<Frontmatter, FrontmatterError> {
    let mut frontmatter: Frontmatter = if yaml.trim().is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    if frontmatter.title.trim().is_empty() {
        return Err(FrontmatterError::MissingTitle);
    }

    frontmatter.slug = frontmatter.slug.as_deref().map(normalize_slug).transpose()?;
    Ok(frontmatter)
}

/// Drop empty and `.` segments; reject segments that could leave the site root.
pub fn normalize_slug(slug: &str) -> Result<String, FrontmatterError> {
    let mut segments = Vec::new();
    for segment in slug.split('/') {
        match segment.trim() {
            "" | "." => {}
            ".." => return Err(FrontmatterError::InvalidSlug(slug.to_string())),
            s if s.contains('\\') => return Err(FrontmatterError::InvalidSlug(slug.to_string())),
            s => segments.push(s),
        }
    }
    Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_header_from_body() {
        let source = "---\ntitle: Landing\norder: 1\npreview: true\n---\n# Landing Page\n";

        let split = split_frontmatter(source).unwrap();
        let fm = split.frontmatter.unwrap();

        assert_eq!(fm.title, "Landing");
        assert_eq!(fm.order, Some(1));
        assert!(fm.preview);
        assert!(fm.nav);
        assert_eq!(split.body, "# Landing Page\n");
        assert_eq!(split.body_line, 5);
    }

    #[test]
    fn page_without_header_is_all_body() {
        let source = "\n# Cards\n\n---\n";

        let split = split_frontmatter(source).unwrap();

        assert_eq!(split.frontmatter, None);
        assert_eq!(split.body, source);
        assert_eq!(split.body_line, 0);
    }

    #[test]
    fn only_a_bare_delimiter_closes_the_header() {
        let err = split_frontmatter("---\ntitle: Rules\n----\nbody\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Unclosed(1)));

        let err = split_frontmatter("\n\n---\ntitle: Late\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Unclosed(3)));
    }

    #[test]
    fn header_needs_a_title() {
        assert!(matches!(
            split_frontmatter("---\norder: 2\n---\n"),
            Err(FrontmatterError::MissingTitle)
        ));
        assert!(matches!(
            split_frontmatter("---\n---\n"),
            Err(FrontmatterError::MissingTitle)
        ));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(matches!(
            split_frontmatter("---\ntitle: [oops\n---\n"),
            Err(FrontmatterError::InvalidYaml(_))
        ));
    }

    #[test]
    fn slugs_are_normalized() {
        let split = split_frontmatter("---\ntitle: Hero\nslug: /heroes//./dark/\n---\n").unwrap();
        assert_eq!(split.frontmatter.unwrap().slug.as_deref(), Some("heroes/dark"));

        assert_eq!(normalize_slug("/").unwrap(), "");
    }

    #[test]
    fn slugs_cannot_escape_the_site() {
        for slug in ["../../x", "a/../b", "..", "a\\b"] {
            assert!(
                matches!(normalize_slug(slug), Err(FrontmatterError::InvalidSlug(_))),
                "{slug}"
            );
        }

        assert!(split_frontmatter("---\ntitle: X\nslug: ../etc\n---\n").is_err());
    }
}
