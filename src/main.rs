use raftkv::{Clerk, Environment, KvServer, LocalCluster, err};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = Environment::init();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cluster = LocalCluster::new(env.replicas);
    let servers: Vec<_> = (0..env.replicas)
        .map(|id| {
            let (consensus, commit_stream) = cluster.connect(id);
            KvServer::start(consensus, commit_stream, env.kv_config())
        })
        .collect();
    info!(replicas = env.replicas, "cluster started");

    let mut clerk = Clerk::new(servers.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let args: Vec<&str> = line.split_whitespace().collect();
        match args.as_slice() {
            | [] => continue,
            | ["get", key] => println!("{}", clerk.get(key).await),
            | ["put", key, value] => {
                clerk.put(key, value).await;
                println!("OK");
            },
            | ["append", key, value] => {
                clerk.append(key, value).await;
                println!("OK");
            },
            | ["leader"] => println!("{}", cluster.leader()),
            | [cmd @ ("leader" | "disconnect" | "reconnect"), id] => {
                let id = match replica_id(id, cluster.replica_count()) {
                    | Ok(id) => id,
                    | Err(e) => {
                        println!("{e}");
                        continue;
                    },
                };
                match *cmd {
                    | "leader" => cluster.elect(id),
                    | "disconnect" => cluster.disconnect(id),
                    | _ => cluster.reconnect(id),
                }
            },
            | ["quit"] => break,
            | _ => println!("unknown command: {line}"),
        }
    }

    servers.iter().for_each(KvServer::kill);
    Ok(())
}

fn replica_id(arg: &str, replicas: usize) -> anyhow::Result<usize> {
    match arg.parse::<usize>() {
        | Ok(id) if id < replicas => Ok(id),
        | _ => err!(format!("no replica {arg}")),
    }
}
