//! Usage text shown when the `help` key is set.
//!
//! Rendering is side-effect free so it can be tested; printing to standard
//! output happens at the FFI edge, where the host expects it before plugin
//! construction fails with a retry status.

use std::fmt::Write;

use crate::algo::AlgorithmRegistry;

/// Render the usage text, listing every accepted key and the algorithms
/// registered in `registry`.
pub fn render(registry: &AlgorithmRegistry) -> String {
    let algos: Vec<&str> = registry.names().collect();
    let default_algo = algos.first().copied().unwrap_or("dummy");
    let mut text = String::new();

    let _ = writeln!(
        text,
        "Usage:\n\
         \taplay -D procplug:[ algo=<algo name>,      |\n\
         \t                    slave=<slave name>,    |\n\
         \t                    dump_enable=<0 or 1>,  |\n\
         \t                    input_fname=<file>,    |\n\
         \t                    output_fname=<file>,   |\n\
         \t                    help=<0 or 1>          ] <audio file>\n"
    );
    let _ = writeln!(
        text,
        "Example:\n\
         \taplay -D procplug:algo=\\\"{default_algo}\\\",slave=\\\"hw:1,0,0\\\",dump_enable=1 ~/s_48k_16.wav\n\
         \nFor help:\n\
         \taplay -D procplug:help=1\n"
    );
    let _ = writeln!(
        text,
        "algo         - algorithm name. Available: {}.",
        algos.join(", ")
    );
    let _ = writeln!(
        text,
        "slave        - slave device name. Use aplay -l to find devices,\n\
         \t       e.g. \\\"hw:1,0,0\\\" or \\\"plughw:1,0,0\\\"."
    );
    let _ = writeln!(
        text,
        "dump_enable  - capture raw audio to files. 0 -> disable, 1 -> enable.\n\
         input_fname  - dump file for samples before processing.\n\
         output_fname - dump file for samples after processing.\n\
         help         - 1 to show this text.\n"
    );
    let _ = writeln!(
        text,
        "The plugin accepts S16 and S32 input; wrap it in a \"plug\" layer to\n\
         convert other formats:\n\
         \taplay -Dplug:\\'procplug:algo=\\\"{default_algo}\\\"\\' ~/s_48k_16.wav"
    );
    text
}

/// Print the usage text to standard output.
pub fn print(registry: &AlgorithmRegistry) {
    print!("{}", render(registry));
}
