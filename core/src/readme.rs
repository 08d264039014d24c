use std::path::Path;

use crate::sink::Sink;

pub const README_FILENAME: &str = "README.md";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamMembers {
    pub first: Option<String>,
    pub second: Option<String>,
}

fn member_key(n: u8) -> String {
    format!("Team member {}:", n)
}

fn non_blank(s: &str) -> Option<String> {
    Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_owned)
}

pub fn parse_team_members(readme: &str) -> TeamMembers {
    let (key1, key2) = (member_key(1), member_key(2));
    let mut members = TeamMembers::default();
    for line in readme.lines().map(str::trim) {
        if let Some((_, name)) = line.split_once(&key1) {
            members.first = non_blank(name);
        } else if let Some((_, name)) = line.split_once(&key2) {
            members.second = non_blank(name);
        }
    }
    members
}

/// Team member names declared in the submission's README, if any.
pub fn team_members(sink: &dyn Sink, submission: &Path) -> TeamMembers {
    let path = submission.join(README_FILENAME);
    if !path.is_file() {
        sink.info(&format!("Could not find {:?} in directory", path));
        return TeamMembers::default();
    }
    let text = match fsutil::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            sink.warning(&e.to_string());
            return TeamMembers::default();
        }
    };

    let members = self::parse_team_members(&text);
    if members.first.is_none() && members.second.is_none() {
        sink.warning("Could not find team names");
    }
    members
}
