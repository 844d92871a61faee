use std::fs;
use std::path::Path;
use tempfile::tempdir;

use tagmove::prelude::*;

#[test]
fn prelude_covers_a_library_run() -> Result<()> {
    let td = tempdir()?;
    let root = dunce::canonicalize(td.path())?;
    let src = root.join("in").join("x.flac");
    fs::create_dir_all(src.parent().unwrap())?;
    fs::write(&src, "x")?;

    let tags = |_: &Path| -> Result<MetadataRecord> {
        Ok(MetadataRecord::tagged([
            (Field::AlbumArtist, "Band"),
            (Field::Album, "Debut"),
            (Field::TrackNumber, "1"),
            (Field::Title, "Opener"),
        ]))
    };
    let mut cfg = Config::new(format!("{}/%z/%b/%n-%t", root.display()));
    cfg.simulate = false;
    cfg.path_conversion = PathConversion::Posix;
    let format = StaticFormat(cfg.template()?);

    let walker = TreeWalker::new(&cfg, &tags, &format);
    let result = walker.run(&[root.join("in")])?;

    assert_eq!(result.files, 1);
    assert!(result.moved_out, "emptied input directory is removed");
    assert!(!root.join("in").exists());
    assert_eq!(fs::read_to_string(root.join("Band/Debut/01-Opener.flac"))?, "x");
    Ok(())
}

#[test]
fn scripted_format_through_prelude() -> Result<()> {
    let script = ScriptedFormat::new(|path: &Path, rec: &MetadataRecord| {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Ok(if ext == "mp3" { "lossy/%t".to_string() } else { format!("{}/%t", rec.field(Field::Artist)) })
    });
    let rec = MetadataRecord::tagged([(Field::Artist, "A"), (Field::Title, "T")]);
    let mp3 = script.template_for(Path::new("/m/a.mp3"), &rec)?;
    let flac = script.template_for(Path::new("/m/a.flac"), &rec)?;
    assert_eq!(mp3.expand(&rec, PathConversion::Posix), "lossy/T");
    assert_eq!(flac.expand(&rec, PathConversion::Posix), "A/T");
    Ok(())
}
