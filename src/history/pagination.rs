use regex::Regex;
use std::sync::OnceLock;

fn link_entry_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"<([^>]+)>;\s*rel="([^"]+)""#).unwrap())
}

fn page_param_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[?&]page=(\d+)").unwrap())
}

/// The value of the `Link` header in a raw header block, if any
pub fn link_header(headers: &str) -> Option<&str> {
    headers.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("link")
            .then(|| value.trim())
    })
}

/// Page number of the `rel="last"` link, if the response is paginated
pub fn last_page(headers: &str) -> Option<u32> {
    let link = link_header(headers)?;

    link_entry_regex()
        .captures_iter(link)
        .filter(|caps| &caps[2] == "last")
        .find_map(|caps| {
            let url = caps.get(1)?.as_str();
            page_param_regex().captures(url)?[1].parse().ok()
        })
}
