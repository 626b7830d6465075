//! Best-effort login-user heuristic.
//!
//! Maps platform and AMI metadata to a likely default SSH user through an
//! ordered keyword rule list (first match wins). This is a guess, not
//! authoritative: providers do not expose the login user, so the tables
//! below encode common image naming conventions and nothing more.

/// Fallback when no rule matches.
pub const DEFAULT_USER: &str = "ec2-user";

/// Coarse rules applied to the platform description at discovery time.
const PLATFORM_RULES: &[(&str, &str)] = &[
    ("ubuntu", "ubuntu"),
    ("windows", "Administrator"),
];

/// Refinement rules applied to AMI name + description once the batched
/// image lookup has run. Order matters; first match wins.
const IMAGE_RULES: &[(&[&str], &str)] = &[
    (&["ubuntu"], "ubuntu"),
    (&["centos"], "centos"),
    (&["rhel"], "ec2-user"),
    (&["fedora"], "fedora"),
    (&["amzn2", "amazon linux 2"], "ec2-user"),
    (&["amazon linux ami", "amzn-ami"], "ec2-user"),
];

/// Coarse pass: guess from the platform description alone.
pub fn platform_user(platform_details: &str) -> &'static str {
    let text = platform_details.to_lowercase();
    for &(keyword, user) in PLATFORM_RULES {
        if text.contains(keyword) {
            return user;
        }
    }
    DEFAULT_USER
}

/// Refinement pass: re-guess from AMI metadata, keeping `current` when no
/// rule matches. Comparisons are case-insensitive substring matches against
/// the concatenated name and description.
pub fn refine_user(current: &str, image_name: &str, image_description: &str) -> String {
    let text = format!("{} {}", image_name, image_description).to_lowercase();
    for &(keywords, user) in IMAGE_RULES {
        if keywords.iter().any(|k| text.contains(k)) {
            return user.to_string();
        }
    }
    current.to_string()
}

/// Both passes in sequence; the refinement always takes precedence over
/// the coarse guess when image metadata matches a rule.
pub fn infer_user(platform_details: &str, image_name: &str, image_description: &str) -> String {
    refine_user(platform_user(platform_details), image_name, image_description)
}
