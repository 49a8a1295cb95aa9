//! Client-side companion for the code block copy buttons.
//!
//! The rendered HTML carries no event handlers. Pages include this script
//! once; it installs a single delegated `click` listener that copies the
//! text of the code block a button belongs to.

/// Class of the copy button inside a rendered code block.
pub const COPY_BUTTON_CLASS: &str = "md-code-copy";

/// Class of the wrapper around a rendered code block.
pub const CODE_BLOCK_CLASS: &str = "md-code-block";

/// Initial copy button label.
pub const COPY_LABEL: &str = "복사";

const CLIPBOARD_SCRIPT: &str = r#"(function () {
  var root = document.documentElement;
  if (root.hasAttribute('data-md-code-copy')) {
    return;
  }
  root.setAttribute('data-md-code-copy', '');

  function fallbackCopy(text) {
    var area = document.createElement('textarea');
    area.value = text;
    area.setAttribute('readonly', '');
    area.style.position = 'fixed';
    area.style.top = '0';
    area.style.left = '0';
    area.style.opacity = '0';
    document.body.appendChild(area);
    area.focus();
    area.select();
    var ok = false;
    try {
      ok = document.execCommand('copy');
    } catch (e) {
      ok = false;
    }
    document.body.removeChild(area);
    return ok ? Promise.resolve() : Promise.reject(new Error('copy failed'));
  }

  function copyText(text) {
    if (navigator.clipboard && window.isSecureContext) {
      return navigator.clipboard.writeText(text).catch(function () {
        return fallbackCopy(text);
      });
    }
    return fallbackCopy(text);
  }

  function flash(button, label) {
    button.textContent = label;
    window.setTimeout(function () {
      button.textContent = '복사';
    }, 1500);
  }

  document.addEventListener('click', function (event) {
    var target = event.target;
    if (!target || typeof target.closest !== 'function') {
      return;
    }
    var button = target.closest('.md-code-copy');
    if (!button) {
      return;
    }
    var block = button.closest('.md-code-block');
    var code = block && block.querySelector('pre code');
    if (!code) {
      return;
    }
    copyText(code.textContent).then(
      function () {
        flash(button, '복사됨');
      },
      function () {
        flash(button, '복사 실패');
      }
    );
  });
})();
"#;

/// Script to include once per page next to rendered descriptions.
#[must_use]
pub const fn clipboard_script() -> &'static str {
    CLIPBOARD_SCRIPT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_targets_rendered_classes() {
        let script = clipboard_script();
        assert!(script.contains(&format!("'.{COPY_BUTTON_CLASS}'")));
        assert!(script.contains(&format!("'.{CODE_BLOCK_CLASS}'")));
        assert!(script.contains(&format!("'{COPY_LABEL}'")));
    }

    #[test]
    fn test_script_has_legacy_fallback() {
        let script = clipboard_script();
        assert!(script.contains("navigator.clipboard"));
        assert!(script.contains("execCommand('copy')"));
        assert!(script.contains("textarea"));
    }

    #[test]
    fn test_script_defines_no_global_function() {
        assert!(clipboard_script().starts_with("(function () {"));
        assert!(!clipboard_script().contains("window.copy"));
    }
}
