use resbridge_cli::{Invocation, init_logging, run};

fn main() {
    let invocation = Invocation::parse();
    init_logging(invocation.args.verbose);

    if let Err(e) = run(&invocation) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
