use dual_stack_check::{
    cmdline,
    configure::Config,
    firewall::Firewall,
    listener::Listener,
    loopback::LoopbackListener,
    serve::{Accept, Server},
};
use eyre::Result;
use std::io::{self, Stdout};

fn main() -> Result<()> {
    env_logger::init();

    let command = cmdline::register_args();
    let config = Config::from(command.get_matches());

    let mut stdout = io::stdout();
    if config.ipv4_loopback {
        let listener = LoopbackListener::bind(&config, &mut stdout)?;
        listener.write_banner(&mut stdout)?;
        run(listener, stdout);
    } else {
        let listener = Listener::bind(&config, &mut stdout)?;
        listener.write_banner(&mut stdout)?;
        run(listener, stdout);
    }

    Ok(())
}

fn run<A: Accept>(acceptor: A, stdout: Stdout) {
    let mut server = Server::new(Firewall::new(acceptor), stdout);
    server.serve(None);
}
