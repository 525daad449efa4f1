//! Slash-command metadata.
//!
//! Describes the four commands in the shape chat platforms expect when
//! registering application commands. Uploading the manifest is left to an
//! external deploy step; `mogu commands` only prints it.

use serde::{Serialize, Serializer};

use crate::dispatch::CommandKind;
use crate::event::labels;

/// Which set of names to register under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Naming {
    /// English identifiers such as `add-restaurant`.
    #[default]
    English,
    /// The original Korean identifiers such as `맛집추가`.
    Korean,
}

impl Naming {
    fn pick(self, pair: [&'static str; 2]) -> &'static str {
        match self {
            Self::English => pair[0],
            Self::Korean => pair[1],
        }
    }
}

/// Value type of a command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Free text.
    String,
    /// Whole number.
    Integer,
}

impl OptionKind {
    /// Numeric type code used by the platform API.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::String => 3,
            Self::Integer => 4,
        }
    }
}

impl Serialize for OptionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// One registrable command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDefinition {
    /// Command identifier.
    pub name: &'static str,
    /// Help text.
    pub description: &'static str,
    /// Options in display order.
    pub options: Vec<OptionDefinition>,
}

/// One option of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionDefinition {
    /// Option label.
    pub name: &'static str,
    /// Help text.
    pub description: &'static str,
    /// Value type.
    #[serde(rename = "type")]
    pub kind: OptionKind,
    /// Whether the platform should demand a value.
    pub required: bool,
}

fn option(
    naming: Naming,
    label: [&'static str; 2],
    description: [&'static str; 2],
    kind: OptionKind,
    required: bool,
) -> OptionDefinition {
    OptionDefinition {
        name: naming.pick(label),
        description: naming.pick(description),
        kind,
        required,
    }
}

/// Definition of a single command.
#[must_use]
pub fn definition(kind: CommandKind, naming: Naming) -> CommandDefinition {
    use OptionKind::{Integer, String as Text};

    let name = naming.pick([kind.name(), kind.korean_name()]);
    let (description, options) = match kind {
        CommandKind::Add => (
            ["Add a restaurant to the list.", "맛집을 리스트에 추가해."],
            vec![
                option(naming, labels::NAME, ["Restaurant name", "맛집 이름"], Text, true),
                option(
                    naming,
                    labels::AREA,
                    ["e.g. Hongdae, Gangnam, Seongsu", "예: 홍대, 강남, 성수"],
                    Text,
                    true,
                ),
                option(
                    naming,
                    labels::GENRE,
                    ["e.g. Japanese, BBQ, Cafe", "예: 일식, 고기, 카페"],
                    Text,
                    true,
                ),
                option(
                    naming,
                    labels::REVIEW,
                    ["Short reason to go", "짧게 추천 포인트"],
                    Text,
                    true,
                ),
                option(
                    naming,
                    labels::MEMO,
                    ["Optional: waiting times, tips", "선택: 웨이팅/팁 등"],
                    Text,
                    false,
                ),
            ],
        ),
        CommandKind::Delete => (
            ["[Admin] Delete a restaurant.", "[관리자] 맛집을 삭제해."],
            vec![option(
                naming,
                labels::POSITION,
                ["Number in the list", "리스트 번호"],
                Integer,
                true,
            )],
        ),
        CommandKind::Search => (
            [
                "Find restaurants by name, area, or genre.",
                "이름/지역/장르로 맛집을 찾아줘.",
            ],
            vec![option(
                naming,
                labels::KEYWORD,
                ["e.g. Seongsu / Ramen / Motsunabe", "예: 성수 / 라멘 / 모츠나베"],
                Text,
                true,
            )],
        ),
        CommandKind::List => (
            ["Show the saved restaurant list.", "저장된 맛집 리스트를 보여줘."],
            Vec::new(),
        ),
    };

    CommandDefinition {
        name,
        description: naming.pick(description),
        options,
    }
}

/// Definitions for every command, in registration order.
#[must_use]
pub fn command_definitions(naming: Naming) -> Vec<CommandDefinition> {
    CommandKind::ALL
        .into_iter()
        .map(|kind| definition(kind, naming))
        .collect()
}
