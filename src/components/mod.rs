pub mod activity_graph;
