//! Script block wiring plupload to a signed configuration.
//!
//! The event handlers are a fixed template. Option values only reach the page
//! through the JSON settings literal substituted into it, so a quote or brace
//! in a value cannot change the code around it.

use crate::config::UploaderConfig;

const TEMPLATE: &str = include_str!("uploader.js");
const SETTINGS_SLOT: &str = "__SETTINGS__";

/// Render the configuration as an embeddable `<script>` block.
pub fn render_script(config: &UploaderConfig) -> String {
    let script = TEMPLATE.replacen(SETTINGS_SLOT, &settings_literal(config), 1);
    format!("<script>\n//<![CDATA[\n{}//]]>\n</script>", script)
}

/// The settings object as a JavaScript literal safe inside a script element.
pub fn settings_literal(config: &UploaderConfig) -> String {
    let json = serde_json::to_string(config).expect("uploader config is always serializable");
    escape_for_script(&json)
}

/// Escape sequences that would end the script element, open an HTML comment
/// or close the CDATA section. Only string contents can hold them, where the
/// replacements decode to the same characters.
fn escape_for_script(json: &str) -> String {
    json.replace("</", "<\\/")
        .replace("<!--", "\\u003c!--")
        .replace("]]>", "]]\\u003e")
}
