//! Drives the whole hostless pipeline: configuration parsing, adapter
//! construction, lifecycle, and the dump captures on disk.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use alsa_procplug::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn temp(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("procplug-pipeline-{}-{name}", std::process::id()))
}

fn items(pairs: &[(&str, ConfigValue)]) -> Vec<(String, ConfigValue)> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

fn s(value: &str) -> ConfigValue {
    ConfigValue::Str(value.to_owned())
}

#[test]
fn streams_multiple_blocks_through_dump_taps() -> Result<()> {
    init_logging();
    let input = temp("stream-in.raw");
    let output = temp("stream-out.raw");

    let config = PluginConfig::parse(items(&[
        ("type", s("procplug")),
        ("slave", ConfigValue::Compound),
        ("algo", s("dummy")),
        ("dump_enable", ConfigValue::Int(1)),
        ("input_fname", s(input.to_str().unwrap())),
        ("output_fname", s(output.to_str().unwrap())),
    ]))?;

    let registry = AlgorithmRegistry::with_builtins();
    let mut plug = ProcPlug::from_config(config, &registry)?;
    plug.init()?;

    // Three blocks of differing sizes, the way a host would hand them over.
    let blocks: [&[u8]; 3] = [&[1, 2, 3, 4], &[5, 6], &[7, 8, 9, 10, 11, 12]];
    let mut expected = Vec::new();
    for block in blocks {
        let mut dst = vec![0u8; block.len()];
        assert_eq!(plug.transfer(&mut dst, block)?, block.len());
        assert_eq!(dst, block);
        expected.extend_from_slice(block);
        // Captures trail the stream by at most the current block.
        assert_eq!(fs::read(&input)?, expected);
        assert_eq!(fs::read(&output)?, expected);
    }
    plug.close();

    assert_eq!(fs::read(&input)?, expected);
    assert_eq!(fs::read(&output)?, expected);
    let _ = fs::remove_file(&input);
    let _ = fs::remove_file(&output);
    Ok(())
}

#[test]
fn custom_algorithm_reaches_the_output_tap() -> Result<()> {
    init_logging();
    let input = temp("custom-in.raw");
    let output = temp("custom-out.raw");

    struct Invert;
    impl Algorithm for Invert {
        fn transfer(&mut self, dst: &mut [u8], src: &[u8]) -> usize {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = !s;
            }
            src.len()
        }
    }

    let mut registry = AlgorithmRegistry::with_builtins();
    registry.register("invert", || Box::new(Invert));

    let config = PluginConfig::parse(items(&[
        ("slave", ConfigValue::Compound),
        ("algo", s("invert")),
        ("dump_enable", ConfigValue::Int(1)),
        ("input_fname", s(input.to_str().unwrap())),
        ("output_fname", s(output.to_str().unwrap())),
    ]))?;
    let mut plug = ProcPlug::from_config(config, &registry)?;
    plug.init()?;

    let mut dst = [0u8; 4];
    plug.transfer(&mut dst, &[0x00, 0x0f, 0xf0, 0xff])?;
    plug.close();

    // Input tap sees the raw source, output tap the processed bytes.
    assert_eq!(fs::read(&input)?, [0x00, 0x0f, 0xf0, 0xff]);
    assert_eq!(fs::read(&output)?, [0xff, 0xf0, 0x0f, 0x00]);
    let _ = fs::remove_file(&input);
    let _ = fs::remove_file(&output);
    Ok(())
}

#[test]
fn help_aborts_construction_without_side_effects() {
    init_logging();
    let input = temp("help-in.raw");
    let output = temp("help-out.raw");

    let config = PluginConfig::parse(items(&[
        ("slave", ConfigValue::Compound),
        ("algo", s("dummy")),
        ("help", s("yes")),
        ("dump_enable", ConfigValue::Int(1)),
        ("input_fname", s(input.to_str().unwrap())),
        ("output_fname", s(output.to_str().unwrap())),
    ]))
    .unwrap();
    assert!(config.help);

    let registry = AlgorithmRegistry::with_builtins();
    let err = ProcPlug::from_config(config, &registry).unwrap_err();
    assert!(matches!(err, PlugError::HelpRequested));
    assert!(!input.exists());
    assert!(!output.exists());

    // The text the host user would see covers every accepted key.
    let text = alsa_procplug::help::render(&registry);
    for key in ["algo", "slave", "dump_enable", "input_fname", "output_fname"] {
        assert!(text.contains(key));
    }
}
