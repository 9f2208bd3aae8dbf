use clap::Parser;
use cueball::{gfx::scene::SceneVariant, CueballApp, ViewerConfig};

#[derive(Parser, Debug)]
#[command(name = "cueball")]
#[command(about = "Interactive procedural scene viewer", long_about = None)]
#[command(version)]
struct Cli {
    /// Scene to show
    #[arg(value_enum, default_value_t = SceneVariant::PoolTable)]
    scene: SceneVariant,

    /// Sphere latitude bands
    #[arg(long, default_value_t = 20)]
    lats: i32,

    /// Sphere longitude steps
    #[arg(long, default_value_t = 40)]
    longs: i32,
}

impl Cli {
    fn config(&self) -> ViewerConfig {
        ViewerConfig::default()
            .with_title(format!("cueball: {}", self.scene))
            .with_variant(self.scene)
            .with_sphere_tessellation(self.lats, self.longs)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    CueballApp::new(cli.config())?.run()
}
