mod rest_inventory_tests;
