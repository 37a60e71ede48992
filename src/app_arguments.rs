use std::path::PathBuf;
use structopt::StructOpt;

/// App parameters
#[derive(StructOpt, Debug)]
#[structopt(name = "pov_render", about = "Converts Cinema4D scene with cinema2pov and renders it with POV-Ray")]
pub struct AppArguments {
    /// Converter executable (cinema2pov by default, searched in PATH)
    #[structopt(long, env = "POV_RENDER_CONVERTER", parse(from_os_str))]
    pub converter_path: Option<PathBuf>,

    /// Input Cinema4D scene
    #[structopt(long, env = "POV_RENDER_INPUT", parse(from_os_str))]
    pub in_file: Option<PathBuf>,

    /// Output POV-Ray include file
    #[structopt(long, env = "POV_RENDER_OUTPUT", parse(from_os_str))]
    pub out_file: Option<PathBuf>,

    /// Renderer executable (pvengine64 by default, searched in PATH)
    #[structopt(long, env = "POV_RENDER_RENDERER", parse(from_os_str))]
    pub pov_path: Option<PathBuf>,

    /// POV-Ray scene for rendering
    #[structopt(long, env = "POV_RENDER_SCENE", parse(from_os_str))]
    pub pov_scene_file: Option<PathBuf>,

    /// Json config file with launch parameters
    #[structopt(long, env = "POV_RENDER_CONFIG", parse(from_os_str))]
    pub config: Option<PathBuf>,

    /// Do not render if converter failed
    #[structopt(long)]
    pub stop_on_converter_failure: bool,

    /// Print commands without execution
    #[structopt(long)]
    pub dry_run: bool,

    /// Verbose
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,
}
