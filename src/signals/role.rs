use crate::dom::tree::DomTree;

/// Accessibility role of `node`: the explicit `role` attribute when set,
/// otherwise the role implied by its tag.
pub fn role_of<T: DomTree>(tree: &T, node: T::Node) -> Option<String> {
    if let Some(explicit) = tree.attribute(node, "role") {
        let first = explicit.split_whitespace().next()?;
        return Some(first.to_lowercase());
    }
    implicit_role(
        tree.tag(node),
        tree.attribute(node, "type"),
        tree.attribute(node, "href").is_some(),
    )
    .map(String::from)
}

pub fn implicit_role(tag: &str, input_type: Option<&str>, has_href: bool) -> Option<&'static str> {
    let role = match tag {
        "button" => "button",
        "a" | "area" if has_href => "link",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
        "textarea" => "textbox",
        "select" => "combobox",
        "ul" | "ol" => "list",
        "li" => "listitem",
        "img" => "img",
        "nav" => "navigation",
        "main" => "main",
        "header" => "banner",
        "footer" => "contentinfo",
        "aside" => "complementary",
        "form" => "form",
        "table" => "table",
        "tr" => "row",
        "td" => "cell",
        "th" => "columnheader",
        "dialog" => "dialog",
        "input" => return input_role(input_type),
        _ => return None,
    };
    Some(role)
}

fn input_role(input_type: Option<&str>) -> Option<&'static str> {
    match input_type.map(str::to_lowercase).as_deref() {
        None | Some("text") | Some("email") | Some("tel") | Some("url") | Some("password") => {
            Some("textbox")
        }
        Some("search") => Some("searchbox"),
        Some("checkbox") => Some("checkbox"),
        Some("radio") => Some("radio"),
        Some("number") => Some("spinbutton"),
        Some("range") => Some("slider"),
        Some("submit") | Some("button") | Some("reset") | Some("image") => Some("button"),
        _ => None,
    }
}
