use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::ops::Deref;
use std::sync::mpsc::TrySendError;
use std::sync::{mpsc, Arc, Mutex, RwLock};
use std::thread;

use json::JsonValue;
use regex::Regex;

use crate::flow::{min_cut, CapacityGraph, Dinic, FlowTrace, FordFulkerson, MaxFlowAlgorithm};
use crate::schedule::{self, Instance, Period, ScheduleNode};
use crate::visualizer;

struct LoadedNetwork {
    network: CapacityGraph<String>,
}

struct JsonRpcRequest {
    id: JsonValue,
    method: String,
    params: JsonValue,
}

struct InputValidationError(String);
impl Error for InputValidationError {}

impl Debug for InputValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error: {}", self.0)
    }
}
impl Display for InputValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error: {}", self.0)
    }
}

fn validate_and_parse_node(value: &JsonValue) -> Result<String, Box<dyn Error>> {
    let text = match value.as_str() {
        Some(text) => text,
        None => {
            return Err(Box::new(InputValidationError(format!(
                "Expected a node name, got: {value}"
            ))))
        }
    };
    let re = Regex::new(r"^[A-Za-z0-9_.:-]{1,64}$").unwrap();
    if re.is_match(text) {
        Ok(text.to_string())
    } else {
        Err(Box::new(InputValidationError(format!(
            "Invalid node name: {text}"
        ))))
    }
}

fn validate_and_parse_capacity(value: &JsonValue) -> Result<u64, Box<dyn Error>> {
    let parsed = if let Some(number) = value.as_u64() {
        Some(number)
    } else if let Some(text) = value.as_str() {
        text.parse::<u64>().ok()
    } else {
        None
    };
    match parsed {
        Some(capacity) if capacity <= i64::MAX as u64 => Ok(capacity),
        Some(capacity) => Err(Box::new(InputValidationError(format!(
            "Capacity {capacity} is too large. Maximum value is {}.",
            i64::MAX
        )))),
        None => Err(Box::new(InputValidationError(format!(
            "Invalid capacity: {value}"
        )))),
    }
}

pub fn start_server(listen_at: &str, queue_size: usize, threads: u64) {
    let loaded_data: Arc<RwLock<Option<LoadedNetwork>>> = Arc::new(RwLock::new(None));

    let (sender, receiver) = mpsc::sync_channel(queue_size);
    let protected_receiver = Arc::new(Mutex::new(receiver));
    for _ in 0..threads {
        let rec = protected_receiver.clone();
        let data = loaded_data.clone();
        thread::spawn(move || loop {
            let socket = rec.lock().unwrap().recv().unwrap();
            if let Err(e) = handle_connection(data.deref(), socket) {
                println!("Error handling connection: {e}");
            }
        });
    }
    let listener = TcpListener::bind(listen_at).expect("Could not create server.");
    loop {
        match listener.accept() {
            Ok((socket, _)) => match sender.try_send(socket) {
                Ok(()) => {}
                Err(TrySendError::Full(mut socket)) => {
                    let _ = socket.write_all(b"HTTP/1.1 503 Service Unavailable\r\n\r\n");
                }
                Err(TrySendError::Disconnected(_)) => {
                    panic!("Internal communication channel disconnected.");
                }
            },
            Err(e) => println!("Error accepting connection: {e}"),
        }
    }
}

fn handle_connection(
    loaded_data: &RwLock<Option<LoadedNetwork>>,
    mut socket: TcpStream,
) -> Result<(), Box<dyn Error>> {
    let request = read_request(&mut socket)?;
    match request.method.as_str() {
        "load_network" => {
            let response = match load_network(loaded_data, &request.params) {
                Ok(len) => jsonrpc_response(request.id, len),
                Err(e) => jsonrpc_error_response(
                    request.id,
                    -32000,
                    &format!("Error loading network: {e}"),
                ),
            };
            socket.write_all(response.as_bytes())?;
        }
        "compute_FordFulkerson" => {
            generic_compute_flow(&request, loaded_data, socket, FordFulkerson)?;
        }
        "compute_Dinic" => {
            generic_compute_flow(&request, loaded_data, socket, Dinic)?;
        }
        "min_cut" => {
            let response = match min_cut_partition(&request.params, loaded_data) {
                Ok(result) => jsonrpc_response(request.id, result),
                Err(e) => jsonrpc_error_response(request.id, -32000, &format!("{e}")),
            };
            socket.write_all(response.as_bytes())?;
        }
        "check_feasibility" => {
            let response = match check_feasibility(&request.params) {
                Ok(result) => jsonrpc_response(request.id, result),
                Err(e) => jsonrpc_error_response(request.id, -32000, &format!("{e}")),
            };
            socket.write_all(response.as_bytes())?;
        }
        "visualize_capacity_graph" => {
            let response = match visualize_capacity_graph(loaded_data) {
                Ok(dot) => jsonrpc_response(request.id, dot),
                Err(e) => jsonrpc_error_response(request.id, -32000, &format!("{e}")),
            };
            socket.write_all(response.as_bytes())?;
        }
        "visualize_flow_graph" => {
            let response = match visualize_flow_graph(&request.params, loaded_data) {
                Ok(dot) => jsonrpc_response(request.id, dot),
                Err(e) => jsonrpc_error_response(request.id, -32000, &format!("{e}")),
            };
            socket.write_all(response.as_bytes())?;
        }
        _ => socket
            .write_all(jsonrpc_error_response(request.id, -32601, "Method not found").as_bytes())?,
    };
    Ok(())
}

fn load_network(
    loaded_data: &RwLock<Option<LoadedNetwork>>,
    params: &JsonValue,
) -> Result<usize, Box<dyn Error>> {
    let edges = &params["edges"];
    if !edges.is_array() {
        return Err(Box::new(InputValidationError(
            "Invalid arguments: expected an \"edges\" array.".to_string(),
        )));
    }

    let mut network = CapacityGraph::new();
    for entry in edges.members() {
        let from = validate_and_parse_node(&entry["from"])?;
        let to = validate_and_parse_node(&entry["to"])?;
        let capacity = validate_and_parse_capacity(&entry["capacity"])?;
        // Duplicate declarations of a pair accumulate.
        network.add_capacity(from, to, capacity);
    }

    let len = network.edge_count();
    println!(
        "Loaded network: {} nodes, {} edges",
        network.node_count(),
        len
    );
    let mut data = loaded_data.write().unwrap();
    *data = Some(LoadedNetwork { network });
    Ok(len)
}

fn load_current(
    loaded_data: &RwLock<Option<LoadedNetwork>>,
) -> Result<CapacityGraph<String>, Box<dyn Error>> {
    let data = loaded_data.read().unwrap();
    match *data {
        Some(ref data) => Ok(data.network.clone()),
        None => Err(Box::new(InputValidationError(
            "No network loaded".to_string(),
        ))),
    }
}

fn generic_compute_flow<A: MaxFlowAlgorithm>(
    request: &JsonRpcRequest,
    loaded_data: &RwLock<Option<LoadedNetwork>>,
    mut socket: TcpStream,
    algorithm: A,
) -> Result<(), Box<dyn Error>> {
    let source = match validate_and_parse_node(&request.params["source"]) {
        Ok(source) => source,
        Err(e) => {
            socket.write_all(
                jsonrpc_error_response(request.id.clone(), -32602, &format!("{e}")).as_bytes(),
            )?;
            return Ok(());
        }
    };
    let sink = match validate_and_parse_node(&request.params["sink"]) {
        Ok(sink) => sink,
        Err(e) => {
            socket.write_all(
                jsonrpc_error_response(request.id.clone(), -32602, &format!("{e}")).as_bytes(),
            )?;
            return Ok(());
        }
    };
    let with_trace = request.params["trace"].as_bool().unwrap_or_default();

    let network = match load_current(loaded_data) {
        Ok(network) => network,
        Err(e) => {
            socket.write_all(
                jsonrpc_error_response(request.id.clone(), -32000, &format!("{e}")).as_bytes(),
            )?;
            return Ok(());
        }
    };

    socket.write_all(chunked_header().as_bytes())?;

    println!("Computing max flow {source} -> {sink}");
    let mut trace = FlowTrace::new();
    let outcome = algorithm.compute_flow(&network, &source, &sink, with_trace.then_some(&mut trace));
    println!("Computed max flow {source} -> {sink}: {}", outcome.value);

    let flows = outcome
        .residual
        .forward_edges()
        .into_iter()
        .filter(|edge| edge.flow > 0)
        .map(|edge| {
            json::object! {
                from: edge.from,
                to: edge.to,
                flow: edge.flow,
                capacity: edge.capacity,
            }
        })
        .collect::<Vec<_>>();

    let mut result = json::object! {
        maxFlowValue: outcome.value,
        flows: flows,
    };
    if with_trace {
        result["trace"] = trace
            .steps()
            .iter()
            .map(|step| {
                json::object! {
                    path: step.path.clone(),
                    amount: step.amount,
                    total: step.total,
                }
            })
            .collect::<Vec<_>>()
            .into();
    }

    socket.write_all(
        chunked_response(&(jsonrpc_result(request.id.clone(), result) + "\r\n")).as_bytes(),
    )?;
    socket.write_all(chunked_close().as_bytes())?;
    Ok(())
}

fn min_cut_partition(
    params: &JsonValue,
    loaded_data: &RwLock<Option<LoadedNetwork>>,
) -> Result<JsonValue, Box<dyn Error>> {
    let source = validate_and_parse_node(&params["source"])?;
    let sink = validate_and_parse_node(&params["sink"])?;
    let network = load_current(loaded_data)?;

    let outcome = match params["algorithm"].as_str().unwrap_or("Dinic") {
        "FordFulkerson" => FordFulkerson.compute_flow(&network, &source, &sink, None),
        _ => Dinic.compute_flow(&network, &source, &sink, None),
    };
    let (reachable, complement) = min_cut(&outcome.residual, &source);
    let cut_capacity: u64 = network
        .edges()
        .filter(|(from, to, _)| reachable.contains(from.as_str()) && complement.contains(to.as_str()))
        .map(|(_, _, capacity)| capacity)
        .sum();

    Ok(json::object! {
        maxFlowValue: outcome.value,
        cutCapacity: cut_capacity,
        reachable: reachable.iter().cloned().collect::<Vec<_>>(),
        complement: complement.iter().cloned().collect::<Vec<_>>(),
    })
}

fn check_feasibility(params: &JsonValue) -> Result<JsonValue, Box<dyn Error>> {
    let instance = parse_instance(params)?;
    let outcome = schedule::solve_instance(&instance);
    let verdict = schedule::saturation_verdict(
        &outcome.residual,
        &ScheduleNode::Source,
        &ScheduleNode::Sink,
    );
    println!("Feasibility verdict: {verdict}");
    Ok(json::object! {
        verdict: verdict.to_string(),
        maxFlowValue: outcome.value,
    })
}

fn parse_instance(params: &JsonValue) -> Result<Instance, Box<dyn Error>> {
    if !params["slots"].is_array() {
        return Err(Box::new(InputValidationError(
            "Invalid arguments: expected a \"slots\" array.".to_string(),
        )));
    }
    let slot_capacities = parse_amount_array(&params["slot_capacities"], "slot_capacities")?;

    let mut worker_slots = Vec::new();
    for value in params["slots"].members() {
        match value.as_i64() {
            Some(slot) if slot >= 1 && (slot as usize) <= slot_capacities.len() => {
                worker_slots.push(slot as usize - 1);
            }
            _ => {
                return Err(Box::new(InputValidationError(format!(
                    "Invalid slot index: {value} (have {} slots)",
                    slot_capacities.len()
                ))))
            }
        }
    }

    if !params["periods"].is_array() {
        return Err(Box::new(InputValidationError(
            "Invalid arguments: expected a \"periods\" array.".to_string(),
        )));
    }
    let mut periods = Vec::new();
    for entry in params["periods"].members() {
        let demand = validate_and_parse_capacity(&entry["demand"])?;
        let availability = parse_amount_array(&entry["availability"], "availability")?;
        if availability.len() != worker_slots.len() {
            return Err(Box::new(InputValidationError(format!(
                "Expected {} availability values, got {}",
                worker_slots.len(),
                availability.len()
            ))));
        }
        periods.push(Period {
            demand,
            availability,
        });
    }

    Ok(Instance {
        worker_slots,
        slot_capacities,
        periods,
    })
}

fn parse_amount_array(value: &JsonValue, what: &str) -> Result<Vec<u64>, Box<dyn Error>> {
    if !value.is_array() {
        return Err(Box::new(InputValidationError(format!(
            "Invalid arguments: expected a \"{what}\" array."
        ))));
    }
    value.members().map(validate_and_parse_capacity).collect()
}

fn visualize_capacity_graph(
    loaded_data: &RwLock<Option<LoadedNetwork>>,
) -> Result<String, Box<dyn Error>> {
    Ok(visualizer::capacity_graph_dot(&load_current(loaded_data)?))
}

fn visualize_flow_graph(
    params: &JsonValue,
    loaded_data: &RwLock<Option<LoadedNetwork>>,
) -> Result<String, Box<dyn Error>> {
    let source = validate_and_parse_node(&params["source"])?;
    let sink = validate_and_parse_node(&params["sink"])?;
    let network = load_current(loaded_data)?;

    let outcome = match params["algorithm"].as_str().unwrap_or("Dinic") {
        "FordFulkerson" => FordFulkerson.compute_flow(&network, &source, &sink, None),
        _ => Dinic.compute_flow(&network, &source, &sink, None),
    };
    Ok(visualizer::flow_graph_dot(&outcome.residual))
}

fn read_request(socket: &mut TcpStream) -> Result<JsonRpcRequest, Box<dyn Error>> {
    let payload = read_payload(socket)?;
    let mut request = json::parse(&String::from_utf8(payload)?)?;
    println!("Request: {request}");
    let id = request["id"].take();
    let params = request["params"].take();
    match request["method"].as_str() {
        Some(method) => Ok(JsonRpcRequest {
            id,
            method: method.to_string(),
            params,
        }),
        _ => Err(From::from(format!("Invalid JSON-RPC request: {request}"))),
    }
}

fn read_payload(socket: &mut TcpStream) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut reader = BufReader::new(socket);
    let mut length = 0;
    for result in reader.by_ref().lines() {
        let l = result?;
        if l.is_empty() {
            break;
        }

        let header = "content-length: ";
        if l.to_lowercase().starts_with(header) {
            length = l[header.len()..].parse::<usize>()?;
        }
    }
    let mut payload = vec![0u8; length];

    reader.read_exact(payload.as_mut_slice())?;
    Ok(payload)
}

fn jsonrpc_response(id: JsonValue, result: impl Into<json::JsonValue>) -> String {
    let payload = jsonrpc_result(id, result);
    format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{}",
        payload.len(),
        payload
    )
}

fn jsonrpc_result(id: JsonValue, result: impl Into<json::JsonValue>) -> String {
    json::object! {
        jsonrpc: "2.0",
        id: id,
        result: result.into(),
    }
    .dump()
}

fn jsonrpc_error_response(id: JsonValue, code: i64, message: &str) -> String {
    let payload = json::object! {
        jsonrpc: "2.0",
        id: id,
        error: {
            code: code,
            message: message
        }
    }
    .dump();
    format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{}",
        payload.len(),
        payload
    )
}

fn chunked_header() -> String {
    "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n".to_string()
}

fn chunked_response(data: &str) -> String {
    if data.is_empty() {
        String::new()
    } else {
        format!("{:x}\r\n{}\r\n", data.len(), data)
    }
}

fn chunked_close() -> String {
    "0\r\n\r\n".to_string()
}
