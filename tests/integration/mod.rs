// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Aligned Hebrew USFM for the first verses of Genesis
pub const GENESIS_USFM: &str = r#"\id GEN EN_ULT
\h Genesis
\c 1
\p
\v 1 \w בְּ⁠רֵאשִׁ֖ית|lemma="רֵאשִׁית" strong="b:H7225"\w* \w בָּרָ֣א|lemma="בָּרָא" strong="H1254"\w* \w אֱלֹהִ֑ים|lemma="אֱלֹהִים" strong="H0430"\w* \w אֵ֥ת|lemma="אֵת" strong="H0853"\w* \w הַ⁠שָּׁמַ֖יִם|lemma="שָׁמַיִם" strong="d:H8064"\w* \w וְ⁠אֵ֥ת|lemma="אֵת" strong="c:H0853"\w* \w הָ⁠אָֽרֶץ|lemma="אֶרֶץ" strong="d:H0776"\w*׃
\v 2 \w וְ⁠הָ⁠אָ֗רֶץ|lemma="אֶרֶץ" strong="c:d:H0776"\w* \w הָיְתָ֥ה|lemma="הָיָה" strong="H1961"\w* \w תֹ֙הוּ֙|lemma="תֹּהוּ" strong="H8414"\w* \w וָ⁠בֹ֔הוּ|lemma="בֹּהוּ" strong="c:H0922"\w*
\v 10 \w וַ⁠יִּקְרָ֨א|lemma="קָרָא" strong="c:H7121"\w* \w אֱלֹהִ֤ים|lemma="אֱלֹהִים" strong="H0430"\w* \w לַ⁠יַּבָּשָׁה֙|lemma="יַבָּשָׁה" strong="l:d:H3004"\w* \w אֶ֔רֶץ|lemma="אֶרֶץ" strong="H0776"\w*
\c 2
\p
\v 1 \w וַ⁠יְכֻלּ֛וּ|lemma="כָּלָה" strong="c:H3615"\w* \w הַ⁠שָּׁמַ֥יִם|lemma="שָׁמַיִם" strong="d:H8064"\w*
"#;

/// Aligned Greek USFM for John 1, with milestones and a footnote
pub const JOHN_USFM: &str = r#"\id JHN
\c 1
\p
\v 1 \k-s | x-tw="rc://*/tw/dict/bible/kt/word"\*\w Ἐν|x-occurrence="1" x-occurrences="1"\w* \w ἀρχῇ|x-occurrence="1" x-occurrences="1"\w* \w ἦν|x-occurrence="1" x-occurrences="3"\w* \w ὁ|x-occurrence="1" x-occurrences="2"\w* \w λόγος|x-occurrence="1" x-occurrences="2"\w*\k-e\*, \w καὶ|x-occurrence="1" x-occurrences="2"\w* \w ὁ|x-occurrence="2" x-occurrences="2"\w* \w λόγος|x-occurrence="2" x-occurrences="2"\w* \w ἦν|x-occurrence="2" x-occurrences="3"\w* \w πρὸς|x-occurrence="1" x-occurrences="1"\w* \w τὸν|x-occurrence="1" x-occurrences="1"\w* \w Θεόν|x-occurrence="1" x-occurrences="1"\w*.
\f + \ft Some manuscripts differ.\f*
\v 2 \w οὗτος|x-occurrence="1" x-occurrences="1"\w* \w ἦν|x-occurrence="1" x-occurrences="1"\w* \w ἐν|x-occurrence="1" x-occurrences="1"\w* \w ἀρχῇ|x-occurrence="1" x-occurrences="1"\w* \w πρὸς|x-occurrence="1" x-occurrences="1"\w* \w τὸν|x-occurrence="1" x-occurrences="1"\w* \w Θεόν|x-occurrence="1" x-occurrences="1"\w*.
"#;

/// Open Bible Stories markdown for story 1
pub const STORY_01: &str = "# 1. The Creation

![OBS Image](https://cdn.door43.org/obs/jpg/360px/obs-en-01-01.jpg)

This is how the beginning of everything happened. God created the universe and everything in it in six days.

![OBS Image](https://cdn.door43.org/obs/jpg/360px/obs-en-01-02.jpg)

But God was there. Then God said, “Let there be light!” And there was light. God saw that the light was good.

_A Bible story from: Genesis 1-2_
";

/// Test fixture helper for creating temporary directories with local repository clones
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Fixture pre-populated with Genesis, John and story 1
    pub fn with_source_repos() -> Self {
        let fixture = Self::new();
        fixture.create_file("hbo_uhb/01-GEN.usfm", GENESIS_USFM);
        fixture.create_file("el-x-koine_ugnt/44-JHN.usfm", JOHN_USFM);
        fixture.create_file("en_obs/content/01.md", STORY_01);
        fixture
    }

    /// Create a file with given content under the fixture root
    pub fn create_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        // Create parent directories if needed
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Build a tab-separated annotation file from header and rows
    pub fn create_annotation_file(&self, name: &str, header: &[&str], rows: &[&[&str]]) -> PathBuf {
        let mut content = header.join("\t");
        content.push('\n');
        for row in rows {
            content.push_str(&row.join("\t"));
            content.push('\n');
        }
        self.create_file(name, &content)
    }
}
