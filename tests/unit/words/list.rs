use super::*;

struct FailingSource;

impl WordListSource for FailingSource {
    fn describe(&self) -> String {
        "http://127.0.0.1:9/words.txt".to_string()
    }

    fn fetch(&self) -> anyhow::Result<String> {
        anyhow::bail!("connection refused")
    }
}

struct InlineSource(&'static str);

impl WordListSource for InlineSource {
    fn describe(&self) -> String {
        "inline".to_string()
    }

    fn fetch(&self) -> anyhow::Result<String> {
        Ok(self.0.to_string())
    }
}

#[test]
fn parse_trims_and_skips_blank_lines() {
    let words = WordList::parse("alpha\n\n  beta \r\ngamma\n   \n");
    assert_eq!(words, vec!["alpha", "beta", "gamma"]);
}

#[test]
fn failed_fetch_falls_back_to_builtin_list() {
    let list = WordList::load(&FailingSource);
    assert!(list.is_fallback());
    assert_eq!(list.len(), 4);
    assert_eq!(list.words(), FALLBACK_WORDS.map(String::from).as_slice());
}

#[test]
fn empty_resource_falls_back() {
    let list = WordList::load(&InlineSource("\n \n"));
    assert!(list.is_fallback());
    assert_eq!(list.len(), FALLBACK_WORDS.len());
}

#[test]
fn loaded_list_records_source() {
    let list = WordList::load(&InlineSource("kern\nglyph\n"));
    assert_eq!(list.origin(), &WordListOrigin::Source("inline".to_string()));
    assert_eq!(list.len(), 2);
}

#[test]
fn missing_file_falls_back() {
    let src = FileWordSource::new("/definitely/not/here/words.txt");
    assert!(src.fetch().is_err());
    assert!(WordList::load(&src).is_fallback());
}

#[test]
fn default_list_is_unloaded_and_empty() {
    let mut rng = fastrand::Rng::with_seed(1);
    let list = WordList::default();
    assert!(list.is_empty());
    assert_eq!(list.origin(), &WordListOrigin::Unloaded);
    assert!(list.pick(&mut rng).is_none());
}
