use actrec_stats::reducer::Backend;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct BackendsArg {}

pub(crate) fn run(_arg: &BackendsArg) {
    let selected = Backend::detect();
    println!("{:<10} {:<8} {:<10} SELECTED", "BACKEND", "KIND", "AVAILABLE");
    for backend in Backend::ALL {
        println!(
            "{:<10} {:<8} {:<10} {}",
            backend.to_string(),
            backend.category(),
            if backend.is_available() { "yes" } else { "no" },
            if backend == selected { "*" } else { "" }
        );
    }
}
