//! Track resolution: reduce a show's file manifest to an ordered, playable
//! track list.

use tracing::debug;

use crate::archive::{ArchiveApi, ArchiveFile};
use crate::error::RequestError;
use crate::model::{Show, Track};

/// Formats eligible for playback.  All are equally eligible for inclusion;
/// the order here is not the sort order (see [`playable_tracks`]).
const PLAYABLE_FORMATS: [&str; 3] = ["VBR MP3", "64Kb MP3", "Ogg Vorbis"];
const OGG_FORMAT: &str = "Ogg Vorbis";

/// Fetch the show's manifest and keep the playable files, ordered for
/// playback.  An empty list is a valid outcome ("no playable tracks"), not
/// an error; only a transport or decode failure on the manifest fetch fails.
pub async fn resolve_tracks<A: ArchiveApi>(
    api: &A,
    show: &Show,
) -> Result<Vec<Track>, RequestError> {
    let files = api.file_manifest(&show.identifier).await?;
    let tracks = playable_tracks(api, &show.identifier, files);
    debug!("{}: {} playable tracks", show.identifier, tracks.len());
    Ok(tracks)
}

/// Filter and order the manifest.  Nameless files are dropped even when the
/// format matches.  The MP3 variants sort before Ogg Vorbis, and within each
/// group files sort by name ascending, byte order.
fn playable_tracks<A: ArchiveApi>(
    api: &A,
    identifier: &str,
    files: Vec<ArchiveFile>,
) -> Vec<Track> {
    let mut playable: Vec<ArchiveFile> = files
        .into_iter()
        .filter(|file| !file.name.is_empty() && PLAYABLE_FORMATS.contains(&file.format.as_str()))
        .collect();

    playable.sort_by(|a, b| {
        let a_ogg = a.format == OGG_FORMAT;
        let b_ogg = b.format == OGG_FORMAT;
        a_ogg.cmp(&b_ogg).then_with(|| a.name.cmp(&b.name))
    });

    playable
        .into_iter()
        .map(|file| Track {
            url: api.download_url(identifier, &file.name),
            title: file.title,
            name: file.name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::SearchQuery;
    use crate::model::ShowCandidate;

    struct FakeArchive {
        files: Vec<ArchiveFile>,
    }

    impl ArchiveApi for FakeArchive {
        async fn search(&self, _: &SearchQuery) -> Result<Vec<ShowCandidate>, RequestError> {
            Ok(Vec::new())
        }

        async fn file_manifest(&self, _: &str) -> Result<Vec<ArchiveFile>, RequestError> {
            Ok(self.files.clone())
        }

        fn download_url(&self, identifier: &str, file_name: &str) -> String {
            format!("https://archive.test/download/{}/{}", identifier, file_name)
        }
    }

    fn file(name: &str, format: &str) -> ArchiveFile {
        ArchiveFile {
            name: name.into(),
            format: format.into(),
            title: String::new(),
        }
    }

    fn show(identifier: &str) -> Show {
        Show {
            identifier: identifier.into(),
            title: String::new(),
            date: String::new(),
            is_random: false,
        }
    }

    #[tokio::test]
    async fn mp3_variants_sort_before_ogg_and_by_name_within_group() {
        let api = FakeArchive {
            files: vec![
                file("d1t02", "Ogg Vorbis"),
                file("d1t01", "VBR MP3"),
                file("d1t10", "64Kb MP3"),
            ],
        };
        let tracks = resolve_tracks(&api, &show("gd1977-05-08")).await.unwrap();
        let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["d1t01", "d1t10", "d1t02"]);
    }

    #[tokio::test]
    async fn unplayable_formats_and_nameless_files_are_dropped() {
        let api = FakeArchive {
            files: vec![
                file("d1t01.flac", "FLAC"),
                file("", "VBR MP3"),
                file("d1t01.mp3", "VBR MP3"),
                file("info.txt", "Text"),
            ],
        };
        let tracks = resolve_tracks(&api, &show("gd1977-05-08")).await.unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "d1t01.mp3");
    }

    #[tokio::test]
    async fn no_playable_files_is_an_empty_list_not_an_error() {
        let api = FakeArchive {
            files: vec![file("d1t01.flac", "FLAC"), file("d1t02.flac", "FLAC")],
        };
        let tracks = resolve_tracks(&api, &show("gd1977-05-08")).await.unwrap();
        assert!(tracks.is_empty());
    }

    #[tokio::test]
    async fn track_url_and_title_come_from_the_manifest() {
        let mut titled = file("gd77d1t01.mp3", "VBR MP3");
        titled.title = "Bertha".into();
        let api = FakeArchive {
            files: vec![titled, file("gd77d1t02.mp3", "VBR MP3")],
        };
        let tracks = resolve_tracks(&api, &show("gd1977-05-08")).await.unwrap();
        assert_eq!(
            tracks[0].url,
            "https://archive.test/download/gd1977-05-08/gd77d1t01.mp3"
        );
        assert_eq!(tracks[0].display_text(), "Bertha");
        assert_eq!(tracks[1].display_text(), "gd77d1t02.mp3");
    }
}
