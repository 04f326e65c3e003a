pub mod vcenter_response;
