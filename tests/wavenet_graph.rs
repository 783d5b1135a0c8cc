use nntc::ml::models::{
    build_wavenet, LayerSpec, ModelGraph, ModelShape, Padding, WavenetBuilder, WavenetConfig,
    WavenetModel,
};

fn gated_convs(graph: &ModelGraph) -> Vec<(String, usize)> {
    graph
        .nodes
        .iter()
        .filter_map(|node| match &node.layer {
            LayerSpec::Conv1D {
                dilation,
                padding: Padding::Causal,
                ..
            } if node.name.ends_with("_tanh") => Some((node.name.clone(), *dilation)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_io_shapes_follow_window() {
    for (seq_len, features) in [(32, 4), (128, 17), (1, 1)] {
        let graph = build_wavenet(ModelShape::new(seq_len, features)).unwrap();
        assert_eq!(graph.input_shape().unwrap(), (seq_len, features));
        assert_eq!(graph.output_shape().unwrap(), (seq_len, 3));
    }
}

#[test]
fn test_block_structure() {
    let graph = build_wavenet(ModelShape::new(32, 4)).unwrap();

    // Every block feeds the skip sum; the stack-2 batch norm and the final
    // block's residual branch are not on the path to the output
    assert_eq!(
        graph.nodes.iter().filter(|n| n.name.ends_with("_skip")).count(),
        18
    );
    assert_eq!(graph.count_layers("BatchNorm"), 1);
    assert!(graph.nodes.iter().any(|n| n.name == "s1_batch_norm"));
    assert!(graph.nodes.iter().all(|n| n.name != "s2_batch_norm"));
    assert!(graph.nodes.iter().all(|n| n.name != "s2_b9_residual_add"));
    assert_eq!(graph.len(), 115);

    let skip_sum = graph
        .nodes
        .iter()
        .find(|n| n.name == "skip_sum")
        .unwrap();
    assert_eq!(skip_sum.inputs.len(), 18);
}

#[test]
fn test_dilation_schedule_repeats_per_stack() {
    let graph = build_wavenet(ModelShape::new(32, 4)).unwrap();
    let dilations: Vec<usize> = gated_convs(&graph).into_iter().map(|(_, d)| d).collect();

    let stack = vec![1, 2, 4, 8, 16, 32, 64, 128, 256];
    let expected: Vec<usize> = stack.iter().chain(stack.iter()).copied().collect();
    assert_eq!(dilations, expected);
}

#[test]
fn test_param_count_and_receptive_field() {
    for features in [1, 4, 30] {
        let graph = build_wavenet(ModelShape::new(32, features)).unwrap();
        assert_eq!(graph.param_count().unwrap(), 128 * features + 451_651);
        assert_eq!(graph.receptive_field().unwrap(), 1024);
    }
}

#[test]
fn test_graph_json_round_trip_keeps_structure() {
    let graph = build_wavenet(ModelShape::new(16, 5)).unwrap();
    let json = graph.to_json().unwrap();
    assert!(json.contains("\"conv1d\""));

    let restored = ModelGraph::from_json(&json).unwrap();
    assert_eq!(restored, graph);
    assert_eq!(restored.param_count().unwrap(), graph.param_count().unwrap());
}

#[test]
fn test_summary_lists_every_layer() {
    let graph = build_wavenet(ModelShape::new(32, 4)).unwrap();
    let summary = graph.summary().unwrap();

    assert!(summary.contains("Total params: 452163"));
    assert!(summary.contains("Receptive field: 1024"));
    for node in &graph.nodes {
        assert!(summary.contains(&node.name));
    }
}

fn small_model(seed: u64) -> WavenetModel {
    let config = WavenetConfig {
        filters: 6,
        blocks_per_stack: 3,
        ..Default::default()
    };
    let graph = WavenetBuilder::new(config).build(ModelShape::new(10, 2)).unwrap();
    WavenetModel::initialize(&graph, seed).unwrap()
}

fn window() -> Vec<Vec<f64>> {
    (0..10)
        .map(|t| vec![(t as f64 * 0.7).cos(), t as f64 / 10.0])
        .collect()
}

#[test]
fn test_outputs_are_class_distributions() {
    let output = small_model(42).forward(&window()).unwrap();
    assert_eq!(output.len(), 10);
    for row in output {
        assert_eq!(row.len(), 3);
        assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_initialisation_is_deterministic_per_seed() {
    assert_eq!(
        small_model(42).forward(&window()).unwrap(),
        small_model(42).forward(&window()).unwrap()
    );
}

#[test]
fn test_output_does_not_see_the_future() {
    let model = small_model(5);
    let base = model.forward(&window()).unwrap();

    let mut changed = window();
    for row in changed.iter_mut().skip(6) {
        row[0] += 3.0;
        row[1] -= 2.0;
    }
    let after = model.forward(&changed).unwrap();

    assert_eq!(base[..6], after[..6]);
    assert_ne!(base[6..], after[6..]);
}
