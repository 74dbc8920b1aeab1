//! Body reference rewriting.
//!
//! After an image settles under its final name, every reference to it in
//! the post body must follow: the old filename (with whitespace possibly
//! URL-encoded as `%20`), the image's alt text, and any leftover staging
//! path prefix. All transforms are idempotent, so re-saving an unchanged
//! post leaves the body byte-identical.

use regex::{Captures, NoExpand, Regex};

use pressroom_core::error::{AppError, ErrorKind};
use pressroom_core::result::AppResult;

/// Rewrites image references inside post bodies.
#[derive(Debug, Clone, Default)]
pub struct ContentRewriter;

impl ContentRewriter {
    /// Create a new rewriter.
    pub fn new() -> Self {
        Self
    }

    /// Apply the full per-image rewrite: replace the old filename with the
    /// final one, then normalize the alt text of references to the final
    /// filename.
    pub fn rewrite(
        &self,
        body: &str,
        original: &str,
        final_name: &str,
        label: &str,
    ) -> AppResult<String> {
        let body = self.rewrite_filename(body, original, final_name)?;
        self.rewrite_alt_text(&body, final_name, label)
    }

    /// Replace every occurrence of `original` with `final_name`, treating
    /// each whitespace character in the original as matching either literal
    /// whitespace or a `%20` escape.
    pub fn rewrite_filename(
        &self,
        body: &str,
        original: &str,
        final_name: &str,
    ) -> AppResult<String> {
        if original == final_name {
            return Ok(body.to_string());
        }

        let mut pattern = String::with_capacity(original.len() * 2);
        for c in original.chars() {
            if c.is_whitespace() {
                pattern.push_str(r"(\s|%20)");
            } else {
                pattern.push_str(&regex::escape(&c.to_string()));
            }
        }

        let re = compile(&pattern)?;
        Ok(re.replace_all(body, NoExpand(final_name)).into_owned())
    }

    /// Force the alt text of every image reference pointing at `final_name`
    /// to `label`: `![anything](path/final_name)` becomes
    /// `![label](path/final_name)`.
    pub fn rewrite_alt_text(&self, body: &str, final_name: &str, label: &str) -> AppResult<String> {
        let escaped = regex::escape(final_name);
        let re = compile(&format!(r"(!\[)[^\]]*?(\]\([^\[\]]*?{escaped}\))"))?;

        let label = label.to_string();
        Ok(re
            .replace_all(body, |caps: &Captures<'_>| {
                format!("{}{label}{}", &caps[1], &caps[2])
            })
            .into_owned())
    }

    /// Strip a leftover `upload/` staging prefix from references to the
    /// final filename. References to files still in staging keep theirs.
    pub fn strip_staging_prefix(&self, body: &str, final_name: &str) -> String {
        body.replace(&format!("upload/{final_name}"), final_name)
    }
}

fn compile(pattern: &str) -> AppResult<Regex> {
    Regex::new(pattern).map_err(|e| {
        AppError::with_source(ErrorKind::Internal, "Invalid body rewrite pattern", e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_filename_plain() {
        let rewriter = ContentRewriter::new();
        let out = rewriter
            .rewrite_filename("![x](a/photo.jpg) and photo.jpg", "photo.jpg", "final.jpg")
            .unwrap();
        assert_eq!(out, "![x](a/final.jpg) and final.jpg");
    }

    #[test]
    fn test_rewrite_filename_matches_percent_encoded_spaces() {
        let rewriter = ContentRewriter::new();
        let out = rewriter
            .rewrite_filename(
                "![x](a/my%20photo.jpg) ![y](a/my photo.jpg)",
                "my photo.jpg",
                "my-photo.jpg",
            )
            .unwrap();
        assert_eq!(out, "![x](a/my-photo.jpg) ![y](a/my-photo.jpg)");
    }

    #[test]
    fn test_rewrite_filename_escapes_metacharacters() {
        let rewriter = ContentRewriter::new();
        // The dot must not match arbitrary characters.
        let out = rewriter
            .rewrite_filename("photoXjpg photo.jpg", "photo.jpg", "new.jpg")
            .unwrap();
        assert_eq!(out, "photoXjpg new.jpg");
    }

    #[test]
    fn test_rewrite_alt_text() {
        let rewriter = ContentRewriter::new();
        let out = rewriter
            .rewrite_alt_text("![old alt](scaled/photo.jpg)", "photo.jpg", "A sunset")
            .unwrap();
        assert_eq!(out, "![A sunset](scaled/photo.jpg)");
    }

    #[test]
    fn test_rewrite_alt_text_leaves_other_images_alone() {
        let rewriter = ContentRewriter::new();
        let body = "![keep](a/other.jpg) ![fix](a/photo.jpg)";
        let out = rewriter.rewrite_alt_text(body, "photo.jpg", "L").unwrap();
        assert_eq!(out, "![keep](a/other.jpg) ![L](a/photo.jpg)");
    }

    #[test]
    fn test_rewrite_alt_text_with_dollar_in_label() {
        let rewriter = ContentRewriter::new();
        let out = rewriter
            .rewrite_alt_text("![x](photo.jpg)", "photo.jpg", "$1 special")
            .unwrap();
        assert_eq!(out, "![$1 special](photo.jpg)");
    }

    #[test]
    fn test_strip_staging_prefix() {
        let rewriter = ContentRewriter::new();
        let out = rewriter.strip_staging_prefix("![x](blog/upload/photo.jpg)", "photo.jpg");
        assert_eq!(out, "![x](blog/photo.jpg)");
    }

    #[test]
    fn test_full_rewrite_is_idempotent() {
        let rewriter = ContentRewriter::new();
        let body = "![alt](a/my photo.jpg)";
        let once = rewriter.rewrite(body, "my photo.jpg", "final.jpg", "L").unwrap();
        let twice = rewriter.rewrite(&once, "my photo.jpg", "final.jpg", "L").unwrap();
        assert_eq!(once, "![L](a/final.jpg)");
        assert_eq!(once, twice);
    }
}
