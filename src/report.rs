//! Console report rendering.
//!
//! The report is a fixed-width text block per profile. Values are
//! right-aligned so every line comes out 36 columns wide for names and
//! dates of the usual lengths.

use crate::models::UserRecord;

const DATE_FORMAT: &str = "%d %b %y";
const NEVER: &str = "Never";

/// Extract the reportable values of one user: name, creation date, and
/// last login (or the `Never` sentinel when the user has none).
pub fn format_record(user: &UserRecord) -> (String, String, String) {
    let last_login = match user.password_last_used {
        Some(ts) => ts.format(DATE_FORMAT).to_string(),
        None => NEVER.to_string(),
    };

    (
        user.user_name.clone(),
        user.create_date.format(DATE_FORMAT).to_string(),
        last_login,
    )
}

/// Render one profile's report section.
pub fn render_profile_section(profile: &str, unused: &[&UserRecord]) -> String {
    let mut out = String::new();

    out.push_str("-----\n");
    out.push_str(&format!("Unused {} users:\n", profile));

    for user in unused {
        let (name, created, last_login) = format_record(user);
        out.push_str(&format!("User: {:>30}\n", name));
        out.push_str(&format!("Creation date: {:>21}\n", created));
        out.push_str(&format!("Last login: {:>24}\n", last_login));
        out.push('\n');
    }

    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn user(name: &str, last_login: Option<(i32, u32, u32)>) -> UserRecord {
        UserRecord {
            user_name: name.to_string(),
            create_date: Utc.with_ymd_and_hms(2023, 1, 5, 8, 30, 0).unwrap(),
            password_last_used: last_login
                .map(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_format_record_with_last_login() {
        let (name, created, last_login) = format_record(&user("alice", Some((2023, 6, 1))));
        assert_eq!(name, "alice");
        assert_eq!(created, "05 Jan 23");
        assert_eq!(last_login, "01 Jun 23");
    }

    #[test]
    fn test_format_record_never_logged_in() {
        let (_, _, last_login) = format_record(&user("bob", None));
        assert_eq!(last_login, "Never");
    }

    #[test]
    fn test_section_layout() {
        let bob = user("bob", None);
        let carol = user("carol", Some((2023, 6, 1)));
        let unused = vec![&bob, &carol];

        let section = render_profile_section("prod", &unused);

        assert_eq!(
            section,
            "-----\n\
             Unused prod users:\n\
             User:                            bob\n\
             Creation date:             05 Jan 23\n\
             Last login:                    Never\n\
             \n\
             User:                          carol\n\
             Creation date:             05 Jan 23\n\
             Last login:                01 Jun 23\n\
             \n\
             \n"
        );
    }

    #[test]
    fn test_lines_are_fixed_width() {
        let bob = user("bob", None);
        let section = render_profile_section("prod", &[&bob]);

        for line in section.lines().skip(2).filter(|l| !l.is_empty()) {
            assert_eq!(line.len(), 36, "line not 36 columns: {:?}", line);
        }
    }

    #[test]
    fn test_empty_profile_section() {
        let section = render_profile_section("dev", &[]);
        assert_eq!(section, "-----\nUnused dev users:\n\n");
    }
}
