/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::env;
use std::process::ExitCode;

use nucleus_xmpp::{EventKind, Jid, SessionEvent, XmppClient};

fn print_version() {
    println!("nucomp (nucleus) v{}", nucleus_xmpp::VERSION);
}

fn print_usage() {
    println!(concat!(
        "Usage: nucomp [OPTIONS]\n",
        "Connects to an XMPP server as a client or a component and\n",
        "prints the incoming stanzas.\n",
        "Options:\n",
        "  -j, --jid <JID>        Jabber ID\n",
        "  -s, --server <HOST>    Connect to this host instead of the JID domain\n",
        "  -p, --port <PORT>      Connect to this port instead of the default\n",
        "  -c, --component        Connect as a component, asks for the secret\n",
        "      --password <PASS>  Authenticate the client with SASL PLAIN\n",
        "      --no-srv           Do not resolve SRV records\n",
        "      --tls              Wrap the connection in TLS\n",
        "      --debug            Print the exchanged bytes\n",
        "  -h, --help             Display this help message and exit\n",
        "  -v, --version          Display the version and exit\n",
        "Report issues at https://github.com/nucleus-im/nucleus-rust/issues"
    ));
}

fn main() -> ExitCode {
    let mut args = env::args();
    let mut jid: Option<Jid> = None;
    let mut server: Option<String> = None;
    let mut port: Option<u16> = None;
    let mut secret: Option<String> = None;
    let mut password: Option<String> = None;
    let mut use_srv = true;
    let mut tls = false;
    let mut debug = false;

    // Skip the first argument (program name)
    args.next();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-j" | "--jid" => {
                if let Some(value) = args.next() {
                    jid = match Jid::new(&value) {
                        Ok(jid) => Some(jid),
                        Err(err) => {
                            eprintln!("Error: {}", err);
                            return ExitCode::FAILURE;
                        }
                    };
                } else {
                    eprintln!("Error: Jabber ID expected after {arg}");
                    return ExitCode::FAILURE;
                }
            }
            "-s" | "--server" => {
                if let Some(value) = args.next() {
                    server = Some(value);
                } else {
                    eprintln!("Error: host name expected after {arg}");
                    return ExitCode::FAILURE;
                }
            }
            "-p" | "--port" => {
                let value = match args.next() {
                    Some(value) => value,
                    None => {
                        eprintln!("Error: port number expected after {arg}");
                        return ExitCode::FAILURE;
                    }
                };
                port = match value.parse::<u16>() {
                    Ok(port) => Some(port),
                    Err(err) => {
                        eprintln!("Error: invalid port '{value}': {err}");
                        return ExitCode::FAILURE;
                    }
                };
            }
            "-c" | "--component" => {
                secret = match rpassword::prompt_password("Component secret: ") {
                    Ok(secret) => Some(secret),
                    Err(err) => {
                        eprintln!("Error: {}", err);
                        return ExitCode::FAILURE;
                    }
                };
            }
            "--password" => {
                if let Some(value) = args.next() {
                    password = Some(value);
                } else {
                    eprintln!("Error: password expected after {arg}");
                    return ExitCode::FAILURE;
                }
            }
            "--no-srv" => {
                use_srv = false;
            }
            "--tls" => {
                tls = true;
            }
            "--debug" => {
                debug = true;
            }
            "-h" | "--help" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            "-v" | "--version" => {
                print_version();
                return ExitCode::SUCCESS;
            }
            _ => {
                eprintln!("Error: unknown option {arg}");
                return ExitCode::FAILURE;
            }
        }
    }

    let jid = match jid {
        Some(jid) => jid,
        None => {
            eprintln!("Error: a Jabber ID is required, see --help");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = XmppClient::build(jid)
        .server(server)
        .use_srv(use_srv)
        .tls(tls)
        .debug(debug);
    if let Some(port) = port {
        builder = builder.port(port);
    }
    if let Some(secret) = &secret {
        builder = builder.component(secret);
    }
    if let Some(password) = &password {
        builder = builder.password(password);
    }

    let mut client = match builder.connect() {
        Ok(client) => client,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };
    client.on(EventKind::Ready, |_| println!("authenticated"));

    loop {
        match client.next_event() {
            Ok(SessionEvent::Element(stanza)) => println!("{stanza}"),
            Ok(SessionEvent::Closed) => return ExitCode::SUCCESS,
            Ok(_) => (),
            Err(err) => {
                eprintln!("Error: {}", err);
                return ExitCode::FAILURE;
            }
        }
    }
}
